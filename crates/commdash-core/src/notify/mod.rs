// ── Toast notifications ──
//
// Each notification runs its own four-phase lifecycle, timed from creation:
//
//   Entering [0, enter_delay)           opacity 0, slid out
//   Visible  [enter_delay, dismiss_at)  opacity 1, in place
//   Leaving  [dismiss_at, +exit)        opacity 0, slid out
//   Removed  afterwards                 dropped from the center

mod center;
mod clock;

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use center::{NotificationCenter, NotificationView, Transition};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};

/// Severity of a notification; selects its colour and icon.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Parse a kind name, falling back to `Info` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }

    /// Background colour of the toast.
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#27ae60",
            Self::Error => "#e74c3c",
            Self::Warning => "#f39c12",
            Self::Info => "#3498db",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Warning => "!",
            Self::Info => "·",
        }
    }
}

/// Lifecycle phase. Ordered: a notification only ever moves forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Entering,
    Visible,
    Leaving,
    Removed,
}

impl Phase {
    /// The phase that follows this one. `Removed` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::Entering => Self::Visible,
            Self::Visible => Self::Leaving,
            Self::Leaving | Self::Removed => Self::Removed,
        }
    }

    pub fn opacity(self) -> f32 {
        match self {
            Self::Visible => 1.0,
            Self::Entering | Self::Leaving | Self::Removed => 0.0,
        }
    }

    /// Horizontal offset as a percentage of the toast width (slide-in).
    pub fn offset_percent(self) -> u8 {
        match self {
            Self::Visible => 0,
            Self::Entering | Self::Leaving | Self::Removed => 100,
        }
    }
}

/// Lifecycle timings, all measured from creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTimings {
    /// Delay before the toast becomes visible.
    pub enter_delay: Duration,
    /// Time after creation at which the toast starts leaving.
    pub dismiss_after: Duration,
    /// Length of the exit transition.
    pub exit_duration: Duration,
}

impl NotificationTimings {
    pub const DEFAULT: Self = Self {
        enter_delay: Duration::from_millis(100),
        dismiss_after: Duration::from_millis(5000),
        exit_duration: Duration::from_millis(300),
    };

    /// Total time from creation until removal.
    pub fn lifetime(&self) -> Duration {
        self.dismiss_after + self.exit_duration
    }

    /// The phase a notification created `elapsed` ago should be in.
    pub fn phase_at(&self, elapsed: Duration) -> Phase {
        if elapsed >= self.lifetime() {
            Phase::Removed
        } else if elapsed >= self.dismiss_after {
            Phase::Leaving
        } else if elapsed >= self.enter_delay {
            Phase::Visible
        } else {
            Phase::Entering
        }
    }

    /// Offset from creation at which `phase` begins.
    pub fn starts_at(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Entering => Duration::ZERO,
            Phase::Visible => self.enter_delay,
            Phase::Leaving => self.dismiss_after,
            Phase::Removed => self.lifetime(),
        }
    }
}

impl Default for NotificationTimings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Identifier handed out by [`NotificationCenter::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One toast and its current phase.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    shown_at: Instant,
    phase: Phase,
}

impl Notification {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Time since creation as seen at `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.shown_at)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn unknown_kind_falls_back_to_info() {
        assert_eq!(NotificationKind::from_name("success"), NotificationKind::Success);
        assert_eq!(NotificationKind::from_name("ERROR"), NotificationKind::Error);
        assert_eq!(NotificationKind::from_name("danger"), NotificationKind::Info);
        assert_eq!(NotificationKind::from_name(""), NotificationKind::Info);
    }

    #[test]
    fn every_kind_has_a_distinct_colour() {
        let colours: std::collections::HashSet<_> =
            NotificationKind::iter().map(NotificationKind::color).collect();
        assert_eq!(colours.len(), 4);
        assert_eq!(NotificationKind::Info.color(), "#3498db");
    }

    #[test]
    fn default_timeline() {
        let t = NotificationTimings::default();
        let ms = Duration::from_millis;
        assert_eq!(t.phase_at(ms(0)), Phase::Entering);
        assert_eq!(t.phase_at(ms(99)), Phase::Entering);
        assert_eq!(t.phase_at(ms(100)), Phase::Visible);
        assert_eq!(t.phase_at(ms(4999)), Phase::Visible);
        assert_eq!(t.phase_at(ms(5000)), Phase::Leaving);
        assert_eq!(t.phase_at(ms(5299)), Phase::Leaving);
        assert_eq!(t.phase_at(ms(5300)), Phase::Removed);
        assert_eq!(t.lifetime(), ms(5300));
    }

    #[test]
    fn phases_only_move_forward() {
        assert_eq!(Phase::Entering.next(), Phase::Visible);
        assert_eq!(Phase::Visible.next(), Phase::Leaving);
        assert_eq!(Phase::Leaving.next(), Phase::Removed);
        assert_eq!(Phase::Removed.next(), Phase::Removed);
        assert!(Phase::Entering < Phase::Removed);
    }

    #[test]
    fn visual_state_per_phase() {
        assert!((Phase::Entering.opacity() - 0.0).abs() < f32::EPSILON);
        assert!((Phase::Visible.opacity() - 1.0).abs() < f32::EPSILON);
        assert_eq!(Phase::Visible.offset_percent(), 0);
        assert_eq!(Phase::Leaving.offset_percent(), 100);
    }
}
