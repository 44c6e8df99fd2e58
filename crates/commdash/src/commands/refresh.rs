//! Refresh handler: runs the auto-refresh loop for one page location.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use commdash_config::Config;
use commdash_core::refresh::page_path;
use commdash_core::{AutoRefresh, RefreshOutcome, RefreshRegistry};

use crate::cli::{GlobalOpts, RefreshArgs};
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct RefreshReport {
    path: String,
    outcome: RefreshOutcome,
    interval: String,
    ticks: Option<u32>,
    loaded: u64,
}

pub async fn handle(args: RefreshArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    let interval = match &args.interval {
        Some(text) => parse_interval(text)?,
        None => config.refresh_interval()?,
    };
    let path = page_path(&args.location);

    let reloads = Arc::new(AtomicU64::new(0));
    let registry = Arc::new(build_registry(config, &reloads));
    let outcome = registry.classify(&path);
    if outcome != RefreshOutcome::Loaded {
        warn!(%path, %outcome, "page will not be reloaded");
    }

    let window = args.ticks.map(|ticks| tick_window(interval, ticks)).transpose()?;

    let cancel = CancellationToken::new();
    let handle = AutoRefresh::new(Arc::clone(&registry), interval).spawn(path.clone(), cancel.clone());

    match window {
        Some(wait) => {
            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => info!("interrupted"),
            }
        }
        None => {
            let _ = tokio::signal::ctrl_c().await;
            info!("interrupted");
        }
    }
    cancel.cancel();
    let loaded = handle.await.unwrap_or_default();

    let report = RefreshReport {
        path,
        outcome,
        interval: humantime::format_duration(interval).to_string(),
        ticks: args.ticks,
        loaded,
    };
    let text = output::render(
        global.output(),
        &report,
        |r| {
            output::render_detail(&[
                ("Path", r.path.clone()),
                ("Outcome", r.outcome.to_string()),
                ("Interval", r.interval.clone()),
                ("Reloads", r.loaded.to_string()),
            ])
        },
        |r| r.loaded.to_string(),
    )?;
    output::print_output(&text, global.quiet);
    Ok(())
}

/// The dashboard's pages, with a loader for each page listed in config.
fn build_registry(config: &Config, reloads: &Arc<AtomicU64>) -> RefreshRegistry {
    let mut registry = RefreshRegistry::dashboard();
    for page in &config.refresh.pages {
        let counter = Arc::clone(reloads);
        let page_name = page.clone();
        registry.register(page.clone(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            info!(page = %page_name, reload = n, "page data reloaded");
        });
    }
    registry
}

/// How long to run for `ticks` intervals, with half an interval of slack so
/// the last tick lands before the loop stops.
fn tick_window(interval: Duration, ticks: u32) -> Result<Duration, CliError> {
    interval
        .checked_mul(ticks)
        .and_then(|run| run.checked_add(interval / 2))
        .ok_or_else(|| CliError::Validation {
            field: "--ticks".into(),
            reason: format!(
                "{ticks} ticks of {} overflow the timer",
                humantime::format_duration(interval)
            ),
        })
}

fn parse_interval(text: &str) -> Result<Duration, CliError> {
    let interval = humantime::parse_duration(text).map_err(|e| CliError::Validation {
        field: "--interval".into(),
        reason: e.to_string(),
    })?;
    if interval.is_zero() {
        return Err(CliError::Validation {
            field: "--interval".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(interval)
}
