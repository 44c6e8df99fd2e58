use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use super::{
    Clock, Notification, NotificationId, NotificationKind, NotificationTimings, Phase, SystemClock,
};

/// A phase change observed by [`NotificationCenter::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub id: NotificationId,
    pub from: Phase,
    pub to: Phase,
}

/// Render-ready snapshot of one live notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: Phase,
    pub opacity: f32,
    pub offset_percent: u8,
    pub color: &'static str,
}

/// Holds every live notification and advances their lifecycles.
///
/// Notifications are fully independent: no dedup, no cap, no cancellation.
/// Nothing happens between calls; [`tick`](Self::tick) catches every
/// notification up to the clock, reporting each intermediate phase.
#[derive(Debug)]
pub struct NotificationCenter<C: Clock = SystemClock> {
    clock: C,
    timings: NotificationTimings,
    live: Vec<Notification>,
    next_id: u64,
}

impl NotificationCenter<SystemClock> {
    /// A center on the wall clock with default timings.
    pub fn system() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> NotificationCenter<C> {
    pub fn new(clock: C) -> Self {
        Self::with_timings(clock, NotificationTimings::default())
    }

    pub fn with_timings(clock: C, timings: NotificationTimings) -> Self {
        Self {
            clock,
            timings,
            live: Vec::new(),
            next_id: 1,
        }
    }

    pub fn timings(&self) -> &NotificationTimings {
        &self.timings
    }

    /// Create a notification. It starts in [`Phase::Entering`].
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind) -> NotificationId {
        let id = NotificationId(self.next_id);
        self.next_id += 1;

        let notification = Notification {
            id,
            message: message.into(),
            kind,
            created_at: Utc::now(),
            shown_at: self.clock.now(),
            phase: Phase::Entering,
        };
        info!(%id, %kind, message = %notification.message, "notification shown");
        self.live.push(notification);
        id
    }

    /// Like [`show`](Self::show) with the kind given by name; unknown names
    /// become `Info`.
    pub fn show_named(&mut self, message: impl Into<String>, kind: &str) -> NotificationId {
        self.show(message, NotificationKind::from_name(kind))
    }

    pub fn success(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Success)
    }

    pub fn error(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Error)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Warning)
    }

    pub fn info(&mut self, message: impl Into<String>) -> NotificationId {
        self.show(message, NotificationKind::Info)
    }

    /// Advance every notification to the phase its age calls for, dropping
    /// removed ones. Returns the transitions in order, one step at a time.
    pub fn tick(&mut self) -> Vec<Transition> {
        let now = self.clock.now();
        let mut transitions = Vec::new();

        for notification in &mut self.live {
            let target = self.timings.phase_at(notification.age(now));
            while notification.phase < target {
                let from = notification.phase;
                let to = from.next();
                notification.phase = to;
                debug!(id = %notification.id, %from, %to, "notification transition");
                transitions.push(Transition {
                    id: notification.id,
                    from,
                    to,
                });
            }
        }

        self.live.retain(|n| n.phase != Phase::Removed);
        transitions
    }

    /// Snapshot of all live notifications, oldest first, after a tick.
    pub fn active(&mut self) -> Vec<NotificationView> {
        self.tick();
        self.live
            .iter()
            .map(|n| NotificationView {
                id: n.id,
                message: n.message.clone(),
                kind: n.kind,
                phase: n.phase,
                opacity: n.phase.opacity(),
                offset_percent: n.phase.offset_percent(),
                color: n.kind.color(),
            })
            .collect()
    }

    /// Live notifications as of the last tick.
    pub fn notifications(&self) -> &[Notification] {
        &self.live
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Instant of the earliest pending transition, for scheduling the next
    /// tick. `None` when nothing is live.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.live
            .iter()
            .map(|n| n.shown_at + self.timings.starts_at(n.phase.next()))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::notify::ManualClock;
    use pretty_assertions::assert_eq;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn center() -> (ManualClock, NotificationCenter<ManualClock>) {
        let clock = ManualClock::new();
        (clock.clone(), NotificationCenter::new(clock))
    }

    #[test]
    fn one_notification_early_none_after_lifetime() {
        let (clock, mut center) = center();
        center.show("hi", NotificationKind::Success);

        clock.advance(ms(50));
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert!(matches!(active[0].phase, Phase::Entering | Phase::Visible));

        clock.advance(ms(5350));
        assert!(center.active().is_empty());
    }

    #[test]
    fn tick_reports_every_phase_in_order() {
        let (clock, mut center) = center();
        let id = center.info("saved");

        clock.advance(ms(6000));
        let transitions = center.tick();
        assert_eq!(
            transitions,
            vec![
                Transition { id, from: Phase::Entering, to: Phase::Visible },
                Transition { id, from: Phase::Visible, to: Phase::Leaving },
                Transition { id, from: Phase::Leaving, to: Phase::Removed },
            ]
        );
        assert!(center.is_empty());
        assert!(center.tick().is_empty());
    }

    #[test]
    fn notifications_are_independent() {
        let (clock, mut center) = center();
        let first = center.error("first");
        clock.advance(ms(3000));
        let second = center.warning("second");

        clock.advance(ms(2100));
        let active = center.active();
        let phases: Vec<_> = active.iter().map(|v| (v.id, v.phase)).collect();
        assert_eq!(phases, vec![(first, Phase::Leaving), (second, Phase::Visible)]);

        clock.advance(ms(300));
        let active = center.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second);
    }

    #[test]
    fn views_carry_visual_state() {
        let (clock, mut center) = center();
        center.show_named("fallback", "mystery");

        let view = &center.active()[0];
        assert_eq!(view.kind, NotificationKind::Info);
        assert_eq!(view.color, "#3498db");
        assert_eq!(view.offset_percent, 100);

        clock.advance(ms(100));
        let view = &center.active()[0];
        assert_eq!(view.phase, Phase::Visible);
        assert!((view.opacity - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicates_are_not_merged() {
        let (_, mut center) = center();
        center.success("same");
        center.success("same");
        assert_eq!(center.len(), 2);
    }

    #[test]
    fn next_deadline_tracks_the_earliest_transition() {
        let (clock, mut center) = center();
        assert!(center.next_deadline().is_none());

        let start = clock.now();
        center.info("a");
        assert_eq!(center.next_deadline(), Some(start + ms(100)));

        clock.advance(ms(150));
        center.tick();
        assert_eq!(center.next_deadline(), Some(start + ms(5000)));
    }

    #[test]
    fn custom_timings() {
        let clock = ManualClock::new();
        let timings = NotificationTimings {
            enter_delay: ms(10),
            dismiss_after: ms(20),
            exit_duration: ms(5),
        };
        let mut center = NotificationCenter::with_timings(clock.clone(), timings);
        center.info("quick");
        clock.advance(ms(25));
        assert!(center.active().is_empty());
    }
}
