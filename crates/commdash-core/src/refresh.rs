// ── Periodic page refresh ──
//
// Every interval the dashboard reloads the data of the page it is showing.
// Pages are keyed by URL path; a known path whose page never registered a
// loader, or an unknown path, makes the tick a no-op.

use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Default time between refresh ticks (five minutes).
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(300_000);

pub const TRENDS_PATH: &str = "/trends";
pub const GROSS_COMMISSION_PATH: &str = "/gross-commission";
pub const NET_COMMISSION_PATH: &str = "/net-commission";

/// Paths the dashboard knows how to refresh out of the box.
pub const DASHBOARD_PATHS: &[&str] = &[TRENDS_PATH, GROSS_COMMISSION_PATH, NET_COMMISSION_PATH];

/// Reloads the data behind one page.
pub trait PageLoader: Send + Sync {
    fn load(&self);
}

impl<F> PageLoader for F
where
    F: Fn() + Send + Sync,
{
    fn load(&self) {
        self();
    }
}

/// Result of dispatching one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RefreshOutcome {
    /// The page's loader ran.
    Loaded,
    /// The path is known but its page defines no loader.
    MissingLoader,
    /// The path is not a refreshable page.
    UnknownPath,
}

/// Path → loader routing table.
#[derive(Default)]
pub struct RefreshRegistry {
    routes: IndexMap<String, Option<Box<dyn PageLoader>>>,
}

impl std::fmt::Debug for RefreshRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.routes.iter().map(|(path, loader)| (path, loader.is_some())))
            .finish()
    }
}

impl RefreshRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The dashboard's refreshable paths, none with a loader yet.
    pub fn dashboard() -> Self {
        let mut registry = Self::new();
        for path in DASHBOARD_PATHS {
            registry.declare(*path);
        }
        registry
    }

    /// Make `path` refreshable without giving it a loader.
    pub fn declare(&mut self, path: impl Into<String>) {
        self.routes.entry(path.into()).or_insert(None);
    }

    /// Attach (or replace) the loader of `path`, declaring it if needed.
    pub fn register(&mut self, path: impl Into<String>, loader: impl PageLoader + 'static) {
        self.routes.insert(path.into(), Some(Box::new(loader)));
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// What [`dispatch`](Self::dispatch) would do for `path`, without
    /// running anything.
    pub fn classify(&self, path: &str) -> RefreshOutcome {
        match self.routes.get(path) {
            Some(Some(_)) => RefreshOutcome::Loaded,
            Some(None) => RefreshOutcome::MissingLoader,
            None => RefreshOutcome::UnknownPath,
        }
    }

    /// Run the loader for `path`, if there is one.
    pub fn dispatch(&self, path: &str) -> RefreshOutcome {
        match self.routes.get(path) {
            Some(Some(loader)) => {
                debug!(path, "refreshing page data");
                loader.load();
                RefreshOutcome::Loaded
            }
            Some(None) => {
                trace!(path, "page defines no loader");
                RefreshOutcome::MissingLoader
            }
            None => {
                trace!(path, "path is not refreshable");
                RefreshOutcome::UnknownPath
            }
        }
    }
}

/// Extract the path from a page location: an http(s) URL, a scheme-less
/// `host[:port]/path`, or a bare path.
///
/// `https://dash.example/trends?range=30d` → `/trends`,
/// `localhost:8080/trends` → `/trends`.
pub fn page_path(location: &str) -> String {
    let host = location.split('/').next().unwrap_or_default();
    let web = web_url_path(location).or_else(|| {
        looks_like_host(host)
            .then(|| web_url_path(&format!("http://{location}")))
            .flatten()
    });
    if let Some(path) = web {
        return path;
    }
    let path = location
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}

fn web_url_path(location: &str) -> Option<String> {
    let url = url::Url::parse(location).ok()?;
    matches!(url.scheme(), "http" | "https").then(|| url.path().to_owned())
}

fn looks_like_host(segment: &str) -> bool {
    segment == "localhost" || segment.contains([':', '.'])
}

/// Periodic driver: dispatches the current page every interval until
/// cancelled. The first dispatch happens one full interval after start.
#[derive(Debug, Clone)]
pub struct AutoRefresh {
    registry: Arc<RefreshRegistry>,
    interval: Duration,
}

impl AutoRefresh {
    pub fn new(registry: Arc<RefreshRegistry>, interval: Duration) -> Self {
        Self { registry, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Tick until `cancel` fires. Returns how many ticks ran a loader.
    pub async fn run(&self, path: &str, cancel: &CancellationToken) -> u64 {
        let Some(start) = Instant::now().checked_add(self.interval) else {
            warn!(path, interval = ?self.interval, "interval beyond the timer range, never ticking");
            cancel.cancelled().await;
            return 0;
        };
        let mut ticker = tokio::time::interval_at(start, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(path, interval = ?self.interval, "auto-refresh started");

        let mut loaded = 0;
        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,

                _ = ticker.tick() => {
                    if self.registry.dispatch(path) == RefreshOutcome::Loaded {
                        loaded += 1;
                    }
                }
            }
        }

        info!(path, loaded, "auto-refresh stopped");
        loaded
    }

    /// Run on a background task.
    pub fn spawn(self, path: String, cancel: CancellationToken) -> JoinHandle<u64> {
        tokio::spawn(async move { self.run(&path, &cancel).await })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;
    use pretty_assertions::assert_eq;

    fn counting_registry(path: &str) -> (Arc<AtomicU64>, RefreshRegistry) {
        let count = Arc::new(AtomicU64::new(0));
        let mut registry = RefreshRegistry::dashboard();
        let c = Arc::clone(&count);
        registry.register(path, move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        (count, registry)
    }

    #[test]
    fn dispatch_outcomes() {
        let (count, registry) = counting_registry(TRENDS_PATH);
        assert_eq!(registry.dispatch(TRENDS_PATH), RefreshOutcome::Loaded);
        assert_eq!(registry.dispatch(NET_COMMISSION_PATH), RefreshOutcome::MissingLoader);
        assert_eq!(registry.dispatch("/settings"), RefreshOutcome::UnknownPath);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert_eq!(registry.classify(TRENDS_PATH), RefreshOutcome::Loaded);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_is_extensible() {
        let (_, mut registry) = counting_registry(TRENDS_PATH);
        registry.register("/leaderboard", || {});
        assert_eq!(
            registry.paths().collect::<Vec<_>>(),
            vec![TRENDS_PATH, GROSS_COMMISSION_PATH, NET_COMMISSION_PATH, "/leaderboard"]
        );
    }

    #[test]
    fn page_path_from_urls_and_paths() {
        assert_eq!(page_path("https://dash.example/trends?range=30d"), "/trends");
        assert_eq!(page_path("/gross-commission#top"), "/gross-commission");
        assert_eq!(page_path("net-commission"), "/net-commission");
        assert_eq!(page_path(""), "/");
    }

    #[test]
    fn page_path_only_trusts_web_schemes() {
        assert_eq!(page_path("localhost:8080/trends"), "/trends");
        assert_eq!(page_path("localhost/net-commission?x=1"), "/net-commission");
        assert_eq!(page_path("dash.example:443/gross-commission"), "/gross-commission");
        assert_eq!(page_path("localhost:8080"), "/");
        assert_eq!(page_path("http://localhost:8080/trends#chart"), "/trends");
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_interval() {
        let (count, registry) = counting_registry(TRENDS_PATH);
        let refresh = AutoRefresh::new(Arc::new(registry), DEFAULT_REFRESH_INTERVAL);
        let cancel = CancellationToken::new();
        let handle = refresh.spawn(TRENDS_PATH.into(), cancel.clone());

        // Nothing fires before the first full interval.
        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2 * 300)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        cancel.cancel();
        let loaded = handle.await.unwrap_or_default();
        assert_eq!(loaded, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_page_ticks_are_noops() {
        let (count, registry) = counting_registry(TRENDS_PATH);
        let refresh = AutoRefresh::new(Arc::new(registry), Duration::from_secs(1));
        let cancel = CancellationToken::new();
        let handle = refresh.spawn("/settings".into(), cancel.clone());

        tokio::time::sleep(Duration::from_secs(5)).await;
        cancel.cancel();
        assert_eq!(handle.await.unwrap_or(99), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
