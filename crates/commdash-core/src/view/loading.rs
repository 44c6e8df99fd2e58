// ── Loading states ──
//
// Table placeholders give up after a while; chart overlays cover a chart
// briefly the first time it scrolls into view.

use std::time::{Duration, Instant};

/// Placeholder texts that arm the timeout.
pub const LOADING_TEXTS: &[&str] = &["Loading data...", "Loading..."];

/// Text shown once a placeholder times out.
pub const NO_DATA_TEXT: &str = "No data available";

pub const PLACEHOLDER_TIMEOUT: Duration = Duration::from_millis(5000);

pub const CHART_OVERLAY_TEXT: &str = "Loading chart data...";

pub const CHART_OVERLAY_DURATION: Duration = Duration::from_millis(1000);

/// Fraction of a chart that must be on screen before it animates.
pub const CHART_VISIBILITY_THRESHOLD: f64 = 0.1;

/// A "Loading..." cell that turns into "No data available" if the data never
/// arrives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingPlaceholder {
    text: String,
    loading: bool,
    deadline: Option<Instant>,
}

impl LoadingPlaceholder {
    pub fn new(text: impl Into<String>, now: Instant) -> Self {
        let text = text.into();
        let armed = LOADING_TEXTS.contains(&text.trim());
        Self {
            loading: armed,
            deadline: armed.then_some(now + PLACEHOLDER_TIMEOUT),
            text,
        }
    }

    /// Data arrived: replace the text. The timeout no longer applies unless
    /// the new text still says it is loading.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Apply the timeout. Returns `true` if the placeholder changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        if now < deadline {
            return false;
        }
        self.deadline = None;
        if self.text.contains("Loading") {
            self.text = NO_DATA_TEXT.into();
            self.loading = false;
            return true;
        }
        false
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

/// First-view animation state of one chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartLoader {
    animated: bool,
    overlay_since: Option<Instant>,
}

impl ChartLoader {
    /// Report how much of the chart is visible. Returns `true` when this
    /// starts the (one-time) loading animation.
    pub fn on_intersection(&mut self, visible_ratio: f64, now: Instant) -> bool {
        if self.animated || visible_ratio < CHART_VISIBILITY_THRESHOLD {
            return false;
        }
        self.animated = true;
        self.overlay_since = Some(now);
        true
    }

    pub fn overlay_visible(&self, now: Instant) -> bool {
        self.overlay_since
            .is_some_and(|since| now.saturating_duration_since(since) < CHART_OVERLAY_DURATION)
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_times_out() {
        let start = Instant::now();
        let mut cell = LoadingPlaceholder::new("  Loading data... ", start);
        assert!(cell.is_loading());
        assert!(!cell.poll(start + Duration::from_millis(4999)));
        assert!(cell.poll(start + PLACEHOLDER_TIMEOUT));
        assert_eq!(cell.text(), NO_DATA_TEXT);
        assert!(!cell.is_loading());
    }

    #[test]
    fn placeholder_keeps_arrived_data() {
        let start = Instant::now();
        let mut cell = LoadingPlaceholder::new("Loading...", start);
        cell.set_text("R 12 000,00");
        assert!(!cell.poll(start + PLACEHOLDER_TIMEOUT));
        assert_eq!(cell.text(), "R 12 000,00");
    }

    #[test]
    fn other_text_never_arms() {
        let start = Instant::now();
        let mut cell = LoadingPlaceholder::new("Loading charts", start);
        assert!(!cell.is_loading());
        assert!(!cell.poll(start + Duration::from_secs(60)));
        assert_eq!(cell.text(), "Loading charts");
    }

    #[test]
    fn chart_animates_once() {
        let start = Instant::now();
        let mut chart = ChartLoader::default();
        assert!(!chart.on_intersection(0.05, start));
        assert!(chart.on_intersection(0.1, start));
        assert!(chart.overlay_visible(start + Duration::from_millis(999)));
        assert!(!chart.overlay_visible(start + CHART_OVERLAY_DURATION));
        assert!(!chart.on_intersection(1.0, start + Duration::from_secs(5)));
        assert!(chart.is_animated());
    }
}
