//! Notify handler: shows one toast and plays its lifecycle back in real
//! time, printing each phase change as it happens.

use std::time::{Duration, Instant};

use serde::Serialize;

use commdash_config::Config;
use commdash_core::{
    NotificationCenter, NotificationId, NotificationKind, NotificationTimings, Phase, TokioClock,
};

use crate::cli::{GlobalOpts, NotifyArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

/// A phase entered, stamped with its offset on the unscaled timeline.
#[derive(Debug, Serialize)]
struct PhaseEvent {
    at_ms: u64,
    phase: Phase,
}

#[derive(Debug, Serialize)]
struct Playback {
    id: NotificationId,
    message: String,
    kind: NotificationKind,
    color: &'static str,
    events: Vec<PhaseEvent>,
}

pub async fn handle(args: NotifyArgs, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    if !(args.speed.is_finite() && args.speed > 0.0) {
        return Err(CliError::Validation {
            field: "--speed".into(),
            reason: format!("must be a positive number, got {}", args.speed),
        });
    }

    let timeline = config.notification_timings()?;
    let mut center = NotificationCenter::with_timings(TokioClock, scaled(timeline, args.speed)?);

    let kind = NotificationKind::from_name(&args.kind);
    let id = center.show(args.message.clone(), kind);
    let color = output::should_color(global.color());
    let streaming = matches!(global.output(), OutputFormat::Table | OutputFormat::Plain);

    let mut playback = Playback {
        id,
        message: args.message,
        kind,
        color: kind.color(),
        events: Vec::new(),
    };
    record(&mut playback, &timeline, Phase::Entering, streaming, color, global);

    while let Some(deadline) = center.next_deadline() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        for transition in center.tick() {
            record(&mut playback, &timeline, transition.to, streaming, color, global);
        }
    }

    if !streaming {
        let text =
            output::render(global.output(), &playback, |_| String::new(), |_| String::new())?;
        output::print_output(&text, global.quiet);
    }
    Ok(())
}

/// Same lifecycle, `speed` times faster. A speed so close to zero that the
/// toast would outlive the clock is rejected.
fn scaled(timings: NotificationTimings, speed: f64) -> Result<NotificationTimings, CliError> {
    let too_slow = || CliError::Validation {
        field: "--speed".into(),
        reason: format!("{speed} slows the notification beyond any schedulable time"),
    };
    let scale = |d: Duration| Duration::try_from_secs_f64(d.as_secs_f64() / speed).ok();

    let (Some(enter_delay), Some(dismiss_after), Some(exit_duration)) = (
        scale(timings.enter_delay),
        scale(timings.dismiss_after),
        scale(timings.exit_duration),
    ) else {
        return Err(too_slow());
    };
    Instant::now()
        .checked_add(dismiss_after)
        .and_then(|at| at.checked_add(exit_duration))
        .ok_or_else(too_slow)?;

    Ok(NotificationTimings {
        enter_delay,
        dismiss_after,
        exit_duration,
    })
}

fn record(
    playback: &mut Playback,
    timeline: &NotificationTimings,
    phase: Phase,
    streaming: bool,
    color: bool,
    global: &GlobalOpts,
) {
    let at = timeline.starts_at(phase);
    if streaming {
        let line = match global.output() {
            OutputFormat::Plain => phase.to_string(),
            _ => format!(
                "{:>7}  {}  {}  {:<8}  {}",
                format_offset(at),
                playback.id,
                output::kind_badge(playback.kind, color),
                phase,
                playback.message
            ),
        };
        output::print_output(&line, global.quiet);
    }
    playback.events.push(PhaseEvent {
        at_ms: u64::try_from(at.as_millis()).unwrap_or(u64::MAX),
        phase,
    });
}

fn format_offset(at: Duration) -> String {
    format!("{}ms", at.as_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn scaling_shortens_every_phase() {
        let fast = scaled(NotificationTimings::DEFAULT, 2.0).unwrap();
        assert_eq!(fast.enter_delay, Duration::from_millis(50));
        assert_eq!(fast.dismiss_after, Duration::from_millis(2500));
        assert_eq!(fast.lifetime(), Duration::from_millis(2650));
    }

    #[test]
    fn vanishing_speed_is_rejected_not_panicking() {
        for speed in [1e-300, f64::MIN_POSITIVE, 1e-20] {
            let err = scaled(NotificationTimings::DEFAULT, speed).unwrap_err();
            assert!(matches!(err, CliError::Validation { ref field, .. } if field == "--speed"));
        }
    }

    #[test]
    fn huge_speed_collapses_to_zero() {
        let instant = scaled(NotificationTimings::DEFAULT, 1e300).unwrap();
        assert_eq!(instant.lifetime(), Duration::ZERO);
    }
}
