//! L4 Atomic Layer: Time sources and progress calculation for scroll animations
//!
//! All animation progress is derived from absolute timestamps, so the engine
//! reads time through a [`Clock`] that tests can replace.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Tokio's clock, which follows paused and advanced time in tests
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    #[inline]
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move forward to `instant` (never backwards)
    pub fn advance_to(&self, instant: Instant) {
        let target = instant.saturating_duration_since(self.origin);
        if target > self.offset.get() {
            self.offset.set(target);
        }
    }

    /// Time elapsed since the clock was created
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Calculate animation progress (0.0 to 1.0) at `now`
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(start: Instant, now: Instant, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(start);
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if an animation is complete at `now`
#[inline]
pub fn is_complete(start: Instant, now: Instant, duration: Duration) -> bool {
    now.saturating_duration_since(start) >= duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress() {
        let start = Instant::now();
        let duration = Duration::from_millis(400);
        assert_eq!(progress(start, start, duration), 0.0);
        assert!((progress(start, start + Duration::from_millis(100), duration) - 0.25).abs() < 1e-9);
        assert_eq!(progress(start, start + Duration::from_secs(1), duration), 1.0);
    }

    #[test]
    fn test_progress_zero_duration() {
        let start = Instant::now();
        assert_eq!(progress(start, start, Duration::ZERO), 1.0);
        assert!(is_complete(start, start, Duration::ZERO));
    }

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let before = clock.now();
        handle.advance(Duration::from_millis(16));
        assert_eq!(clock.now() - before, Duration::from_millis(16));

        // advance_to never goes backwards
        clock.advance_to(before);
        assert_eq!(clock.elapsed(), Duration::from_millis(16));
    }
}
