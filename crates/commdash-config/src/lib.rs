//! Configuration for the commdash CLI.
//!
//! A TOML file at the platform config path, overlaid by `COMMDASH_*`
//! environment variables, translated into the settings the core types take
//! (`Locale`, `NotificationTimings`, refresh interval, sort memory, export
//! scope).

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use commdash_core::export::DEFAULT_FILENAME;
use commdash_core::refresh::{DASHBOARD_PATHS, DEFAULT_REFRESH_INTERVAL};
use commdash_core::{DirectionMemory, ExportScope, Locale, NotificationTimings};

/// Prefix of environment overrides; nested keys are joined with `__`
/// (`COMMDASH_TABLE__EXPORT_SCOPE=visible-only`).
pub const ENV_PREFIX: &str = "COMMDASH_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Display locale tag: `en-ZA`, `en-US`, or `en-GB`.
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub table: TableSettings,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            defaults: Defaults::default(),
            table: TableSettings::default(),
            notifications: NotificationSettings::default(),
            refresh: RefreshSettings::default(),
        }
    }
}

fn default_locale() -> String {
    "en-ZA".into()
}

/// CLI output defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableSettings {
    /// Whether sort direction is remembered per table or per column.
    #[serde(default)]
    pub direction_memory: DirectionMemory,

    /// Rows included in CSV exports.
    #[serde(default)]
    pub export_scope: ExportScope,

    /// File name used when an export is not given one.
    #[serde(default = "default_filename")]
    pub default_filename: Option<String>,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            direction_memory: DirectionMemory::default(),
            export_scope: ExportScope::default(),
            default_filename: default_filename(),
        }
    }
}

fn default_filename() -> Option<String> {
    Some(DEFAULT_FILENAME.into())
}

/// Toast timings in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_enter_delay")]
    pub enter_delay_ms: u64,

    #[serde(default = "default_dismiss_after")]
    pub dismiss_after_ms: u64,

    #[serde(default = "default_exit_duration")]
    pub exit_duration_ms: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enter_delay_ms: default_enter_delay(),
            dismiss_after_ms: default_dismiss_after(),
            exit_duration_ms: default_exit_duration(),
        }
    }
}

fn default_enter_delay() -> u64 {
    millis(NotificationTimings::DEFAULT.enter_delay)
}
fn default_dismiss_after() -> u64 {
    millis(NotificationTimings::DEFAULT.dismiss_after)
}
fn default_exit_duration() -> u64 {
    millis(NotificationTimings::DEFAULT.exit_duration)
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RefreshSettings {
    /// Human-readable interval, e.g. `"5m"` or `"30s"`.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// Paths that have a page loader.
    #[serde(default = "default_pages")]
    pub pages: Vec<String>,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            pages: default_pages(),
        }
    }
}

fn default_interval() -> String {
    humantime::format_duration(DEFAULT_REFRESH_INTERVAL).to_string()
}
fn default_pages() -> Vec<String> {
    DASHBOARD_PATHS.iter().map(|p| (*p).to_owned()).collect()
}

// ── Translation to core settings ────────────────────────────────────

impl Config {
    pub fn locale(&self) -> Result<Locale, ConfigError> {
        Locale::from_tag(&self.locale).ok_or_else(|| ConfigError::Validation {
            field: "locale".into(),
            reason: format!("expected 'en-ZA', 'en-US', or 'en-GB', got '{}'", self.locale),
        })
    }

    pub fn notification_timings(&self) -> Result<NotificationTimings, ConfigError> {
        let n = &self.notifications;
        if n.enter_delay_ms > n.dismiss_after_ms {
            return Err(ConfigError::Validation {
                field: "notifications.enter_delay_ms".into(),
                reason: format!(
                    "must not exceed dismiss_after_ms ({} > {})",
                    n.enter_delay_ms, n.dismiss_after_ms
                ),
            });
        }
        Ok(NotificationTimings {
            enter_delay: Duration::from_millis(n.enter_delay_ms),
            dismiss_after: Duration::from_millis(n.dismiss_after_ms),
            exit_duration: Duration::from_millis(n.exit_duration_ms),
        })
    }

    pub fn refresh_interval(&self) -> Result<Duration, ConfigError> {
        let interval = humantime::parse_duration(&self.refresh.interval).map_err(|e| {
            ConfigError::Validation {
                field: "refresh.interval".into(),
                reason: e.to_string(),
            }
        })?;
        if interval.is_zero() {
            return Err(ConfigError::Validation {
                field: "refresh.interval".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(interval)
    }

    pub fn direction_memory(&self) -> DirectionMemory {
        self.table.direction_memory
    }

    pub fn export_scope(&self) -> ExportScope {
        self.table.export_scope
    }

    /// Export file name: configured value, else the built-in default.
    pub fn default_filename(&self) -> &str {
        self.table
            .default_filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
    }

    /// Check every field that translates into a core setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.locale()?;
        self.notification_timings()?;
        self.refresh_interval()?;
        Ok(())
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "commdash", "commdash").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("commdash");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from an explicit file path (missing file means defaults) +
/// environment.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML at `path`, creating parent directories.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
