//! Clap derive structures for the `commdash` CLI.
//!
//! Defines the command tree, global flags, and the CLI-side value enums.
//! This file is also compiled by `build.rs` for man page generation, so it
//! depends on nothing but `clap` and `clap_complete`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// commdash -- commission dashboard tables and notifications from the shell
#[derive(Debug, Parser)]
#[command(
    name = "commdash",
    version,
    about = "Sort, filter, export, and format commission dashboard data",
    long_about = "Works on dashboard tables stored as JSON files \
        ({\"id\", \"headers\", \"rows\"}).\n\n\
        Sort and filter them, export them to CSV, format figures the way \
        the dashboard cards do, and play back toast notifications.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format [default: config `defaults.output`, then table]
    #[arg(long, short = 'o', env = "COMMDASH_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: config `defaults.color`, then auto]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "COMMDASH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

impl GlobalOpts {
    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Table)
    }

    pub fn color(&self) -> ColorMode {
        self.color.unwrap_or(ColorMode::Auto)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Format figures as the dashboard displays them
    #[command(alias = "fmt")]
    Format(FormatArgs),

    /// Sort, filter, and export table files
    #[command(alias = "t")]
    Table(TableArgs),

    /// Show a toast notification and play back its lifecycle
    Notify(NotifyArgs),

    /// Run the page auto-refresh loop for a page location
    Refresh(RefreshArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Format ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FormatArgs {
    /// Locale for currency and grouping (en-ZA, en-US, en-GB); overrides config
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: FormatCommand,
}

#[derive(Debug, Subcommand)]
pub enum FormatCommand {
    /// Currency, e.g. 1234.5 -> "R 1 234,50"
    Currency {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
    },

    /// Percentage with fixed decimals, e.g. 12.345 -> "12.3%"
    #[command(alias = "percentage")]
    Percent {
        #[arg(allow_negative_numbers = true)]
        value: f64,

        /// Decimal places
        #[arg(long, short = 'd', default_value = "1")]
        decimals: usize,
    },

    /// Compact number, e.g. 1500 -> "1.5K"
    Number {
        #[arg(allow_negative_numbers = true)]
        num: f64,
    },

    /// Percentage change between two periods
    Change {
        #[arg(allow_negative_numbers = true)]
        current: f64,

        #[arg(allow_negative_numbers = true)]
        previous: f64,
    },
}

// ── Table ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TableArgs {
    #[command(subcommand)]
    pub command: TableCommand,
}

#[derive(Debug, Subcommand)]
pub enum TableCommand {
    /// Print a table after optional sorting and filtering
    Show {
        /// Table file (JSON)
        file: PathBuf,

        #[command(flatten)]
        view: TableViewArgs,

        /// Include rows hidden by the filter
        #[arg(long)]
        all: bool,
    },

    /// Export a table to CSV
    Export {
        /// Table file (JSON)
        file: PathBuf,

        #[command(flatten)]
        view: TableViewArgs,

        /// Download file name (defaults to the configured name, then data.csv)
        #[arg(long)]
        filename: Option<String>,

        /// Directory to save the CSV in; prints to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// Rows to write [default: config `table.export_scope`, then all]
        #[arg(long, value_enum)]
        scope: Option<ExportScopeArg>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportScopeArg {
    /// Every row, including ones hidden by the filter
    All,
    /// Only rows the filter leaves visible
    VisibleOnly,
}

/// Sorting and filtering applied before showing or exporting.
#[derive(Debug, Args)]
pub struct TableViewArgs {
    /// Column to sort by: 0-based index or header label
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// How to compare cells in the sort column
    #[arg(long = "type", short = 't', default_value = "text")]
    pub data_type: SortType,

    /// Sort this many times in a row (each click flips the direction)
    #[arg(long, default_value = "1")]
    pub times: u32,

    /// Keep only rows whose filter column contains this text
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Column to filter on: 0-based index or header label
    #[arg(long, short = 'c', default_value = "0")]
    pub column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortType {
    /// Case-insensitive text
    #[value(alias = "string")]
    Text,
    /// Numeric value of the cell
    Number,
    /// Numeric value with currency symbols and separators ignored
    Currency,
}

// ── Notify ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Message text
    pub message: String,

    /// Notification kind; unknown names fall back to info
    #[arg(long, short = 'k', default_value = "info")]
    pub kind: String,

    /// Playback speed multiplier (2 = twice as fast)
    #[arg(long, default_value = "1.0")]
    pub speed: f64,
}

// ── Refresh ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Page URL or path, e.g. https://dash.example/trends or /trends
    pub location: String,

    /// Stop after this many intervals; runs until Ctrl-C when omitted
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Interval override, e.g. "30s" (defaults to the configured interval)
    #[arg(long)]
    pub interval: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
