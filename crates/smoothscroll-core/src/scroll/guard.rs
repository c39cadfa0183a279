//! L4 Atomic Layer: Direction guard
//!
//! Remembers the direction of the last admitted request. A request whose
//! direction differs on either axis tells the queue to drop everything in
//! flight, so a fling in the opposite direction never fights leftover motion.

/// Normalized direction of a request, each axis in {-1, 0, 1}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Direction {
    pub x: i8,
    pub y: i8,
}

impl Direction {
    pub fn of(dx: f64, dy: f64) -> Self {
        Self {
            x: signum(dx),
            y: signum(dy),
        }
    }
}

#[inline]
fn signum(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

#[derive(Debug, Clone, Default)]
pub struct DirectionGuard {
    direction: Direction,
}

impl DirectionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the direction of a new request.
    ///
    /// The request is always admitted. Returns `true` when its direction
    /// differs from the previous one, in which case the caller must discard
    /// every pending command before appending the new one.
    pub fn admit(&mut self, dx: f64, dy: f64) -> bool {
        let direction = Direction::of(dx, dy);
        let reversed = direction != self.direction;
        self.direction = direction;
        reversed
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_signs() {
        assert_eq!(Direction::of(0.0, -120.0), Direction { x: 0, y: -1 });
        assert_eq!(Direction::of(3.5, 0.0), Direction { x: 1, y: 0 });
    }

    #[test]
    fn test_same_direction_is_kept() {
        let mut guard = DirectionGuard::new();
        guard.admit(0.0, 120.0);
        assert!(!guard.admit(0.0, 40.0));
        assert!(!guard.admit(0.0, 1.0));
        assert_eq!(guard.direction(), Direction { x: 0, y: 1 });
    }

    #[test]
    fn test_reversal_on_either_axis() {
        let mut guard = DirectionGuard::new();
        guard.admit(0.0, 120.0);
        assert!(guard.admit(0.0, -120.0));
        assert!(guard.admit(50.0, -120.0));
        assert!(!guard.admit(10.0, -5.0));
        assert_eq!(guard.direction(), Direction { x: 1, y: -1 });
    }
}
