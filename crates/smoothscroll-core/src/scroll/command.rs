//! L4 Atomic Layer: A single admitted scroll request

use std::time::{Duration, Instant};

use super::easing::Easing;
use super::timing::{is_complete, progress};

/// Offset of `applied` at admission, opposite to the target's sign.
/// Quantizing toward zero then yields exactly the target over the lifetime.
const APPLIED_SENTINEL: f64 = 0.99;

/// Pixels one command contributes to a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandStep {
    pub dx: i64,
    pub dy: i64,
    pub finished: bool,
}

/// One scroll request in flight: move by `(target_x, target_y)` pixels over
/// `duration`, following `easing`.
///
/// Duration and easing are captured at admission, so a configuration change
/// does not bend animations that are already running.
#[derive(Debug, Clone)]
pub struct ScrollCommand {
    target_x: f64,
    target_y: f64,
    applied_x: f64,
    applied_y: f64,
    start: Instant,
    duration: Duration,
    easing: Easing,
}

impl ScrollCommand {
    pub fn new(dx: f64, dy: f64, start: Instant, duration: Duration, easing: Easing) -> Self {
        Self {
            target_x: dx,
            target_y: dy,
            applied_x: sentinel(dx),
            applied_y: sentinel(dy),
            start,
            duration,
            easing,
        }
    }

    #[inline]
    pub fn target(&self) -> (f64, f64) {
        (self.target_x, self.target_y)
    }

    #[inline]
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Advance to `now` and return this tick's contribution.
    ///
    /// `applied` tracks this command's own progress; the queue sums the
    /// returned deltas of all commands into one write.
    ///
    /// Deltas truncate toward zero, not round: together with `APPLIED_SENTINEL`
    /// this lands exactly on whole-pixel targets.
    pub fn advance(&mut self, now: Instant) -> CommandStep {
        let finished = is_complete(self.start, now, self.duration);
        let t = if finished {
            1.0
        } else {
            progress(self.start, now, self.duration)
        };
        let eased = self.easing.apply(t);

        let dx = (self.target_x * eased - self.applied_x).trunc();
        let dy = (self.target_y * eased - self.applied_y).trunc();
        self.applied_x += dx;
        self.applied_y += dy;

        CommandStep {
            // saturating casts
            dx: dx as i64,
            dy: dy as i64,
            finished,
        }
    }
}

#[inline]
fn sentinel(target: f64) -> f64 {
    if target < 0.0 {
        APPLIED_SENTINEL
    } else {
        -APPLIED_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::easing::Pulse;

    fn run_to_end(command: &mut ScrollCommand, frame: Duration) -> (i64, i64, usize) {
        let mut now = command.start();
        let (mut x, mut y, mut frames) = (0, 0, 0);
        loop {
            let step = command.advance(now);
            x += step.dx;
            y += step.dy;
            frames += 1;
            if step.finished {
                return (x, y, frames);
            }
            now += frame;
        }
    }

    #[test]
    fn test_single_command_applies_exact_target() {
        let start = Instant::now();
        let mut command = ScrollCommand::new(
            0.0,
            120.0,
            start,
            Duration::from_millis(400),
            Easing::Pulse(Pulse::new(4.0)),
        );
        let (x, y, _) = run_to_end(&mut command, Duration::from_millis(7));
        assert_eq!(x, 0);
        assert_eq!(y, 120);
    }

    #[test]
    fn test_negative_and_fractional_targets() {
        for (dx, dy) in [(-120.0, -120.0), (-37.5, 250.25), (13.0, -1.0)] {
            let mut command = ScrollCommand::new(
                dx,
                dy,
                Instant::now(),
                Duration::from_millis(300),
                Easing::Pulse(Pulse::new(8.0)),
            );
            let (x, y, _) = run_to_end(&mut command, Duration::from_millis(5));
            assert!((x as f64 - dx).abs() < 1.0, "x {} vs {}", x, dx);
            assert!((y as f64 - dy).abs() < 1.0, "y {} vs {}", y, dy);
        }
    }

    #[test]
    fn test_late_ticks_catch_up() {
        let start = Instant::now();
        let mut command = ScrollCommand::new(
            0.0,
            -120.0,
            start,
            Duration::from_millis(400),
            Easing::Linear,
        );
        // one tick halfway, then a single late tick far past the end
        let first = command.advance(start + Duration::from_millis(200));
        let last = command.advance(start + Duration::from_secs(5));
        assert!(!first.finished);
        assert!(last.finished);
        assert_eq!(first.dy + last.dy, -120);
    }

    #[test]
    fn test_deltas_never_reverse() {
        let start = Instant::now();
        let mut command = ScrollCommand::new(
            0.0,
            500.0,
            start,
            Duration::from_millis(400),
            Easing::Pulse(Pulse::new(4.0)),
        );
        let mut now = start;
        loop {
            let step = command.advance(now);
            assert!(step.dy >= 0);
            if step.finished {
                break;
            }
            now += Duration::from_millis(3);
        }
    }

    #[test]
    fn test_huge_target_does_not_overflow() {
        let start = Instant::now();
        let mut command = ScrollCommand::new(0.0, 1e12, start, Duration::from_millis(400), Easing::Linear);
        let (_, y, _) = run_to_end(&mut command, Duration::from_millis(7));
        assert_eq!(y, 1_000_000_000_000);
    }

    #[test]
    fn test_tiny_pulse_scale_applies_exact_target() {
        let start = Instant::now();
        let mut command = ScrollCommand::new(
            0.0,
            120.0,
            start,
            Duration::from_millis(400),
            Easing::Pulse(Pulse::new(1e-9)),
        );
        let mut now = start;
        let mut total = 0;
        loop {
            let step = command.advance(now);
            assert!(step.dy >= 0);
            total += step.dy;
            if step.finished {
                break;
            }
            now += Duration::from_millis(7);
        }
        assert_eq!(total, 120);
    }
}
