//! L3 Molecular Layer: Scroll queue
//!
//! Holds every command in flight for one scroll target, advances them on a
//! periodic tick and writes their summed contribution to the target.
//!
//! State machine: idle → (command admitted) → running → (last command
//! finished) → idle. While running, the queue carries the deadline of its
//! next tick; the engine's frame driver sleeps until the earliest deadline.

use std::time::{Duration, Instant};

use tracing::trace;

use super::command::ScrollCommand;
use super::easing::Easing;
use super::guard::{Direction, DirectionGuard};
use crate::config::ScrollSettings;
use crate::dom::{Axis, NodeId, ScrollTree};
use crate::overflow::ScrollTarget;

/// Axes that stopped responding to writes during the current batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Exhausted {
    pub x: bool,
    pub y: bool,
}

impl Exhausted {
    #[inline]
    pub fn both(&self) -> bool {
        self.x && self.y
    }
}

/// What one tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Pixels the target actually moved
    pub moved_x: i32,
    pub moved_y: i32,
    /// Commands still in flight after the tick
    pub active: usize,
    /// The queue went back to idle
    pub idle: bool,
}

#[derive(Debug, Clone)]
pub struct ScrollQueue {
    target: ScrollTarget,
    commands: Vec<ScrollCommand>,
    /// A tick is scheduled
    pending: bool,
    next_tick: Option<Instant>,
    guard: DirectionGuard,
    exhausted: Exhausted,
    last_admission: Option<Instant>,
}

impl ScrollQueue {
    pub fn new(target: ScrollTarget) -> Self {
        Self {
            target,
            commands: Vec::new(),
            pending: false,
            next_tick: None,
            guard: DirectionGuard::new(),
            exhausted: Exhausted::default(),
            last_admission: None,
        }
    }

    #[inline]
    pub fn target(&self) -> ScrollTarget {
        self.target
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.pending
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.guard.direction()
    }

    #[inline]
    pub fn exhausted(&self) -> Exhausted {
        self.exhausted
    }

    /// When the next tick is due (None while idle)
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.next_tick
    }

    /// Admit a scroll request of `(dx, dy)` pixels.
    ///
    /// Runs the direction guard first (a reversal discards every pending
    /// command), applies acceleration, then enqueues the command.
    pub fn admit(
        &mut self,
        dx: f64,
        dy: f64,
        now: Instant,
        settings: &ScrollSettings,
        easing: Easing,
    ) {
        if self.guard.admit(dx, dy) {
            if !self.commands.is_empty() {
                trace!(dropped = self.commands.len(), "Direction changed, flushing scroll queue");
            }
            self.flush();
        }

        let (dx, dy) = self.accelerate(dx, dy, now, settings);
        let command = ScrollCommand::new(dx, dy, now, settings.animation_duration(), easing);
        self.enqueue(command, now);
    }

    /// Append a command; an idle queue schedules its first tick immediately
    pub fn enqueue(&mut self, command: ScrollCommand, now: Instant) {
        self.commands.push(command);
        if !self.pending {
            self.pending = true;
            self.next_tick = Some(now);
        }
    }

    /// Drop every command in flight, staying scheduled if running
    fn flush(&mut self) {
        self.commands.clear();
        self.exhausted = Exhausted::default();
        self.last_admission = None;
    }

    /// Return to idle
    pub fn clear(&mut self) {
        self.flush();
        self.pending = false;
        self.next_tick = None;
    }

    fn accelerate(&mut self, dx: f64, dy: f64, now: Instant, settings: &ScrollSettings) -> (f64, f64) {
        if !settings.accelerates() {
            return (dx, dy);
        }

        let mut factor = 1.0;
        if let Some(last) = self.last_admission {
            let elapsed_ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
            if elapsed_ms < settings.acceleration_delta as f64 {
                factor = ((1.0 + 30.0 / elapsed_ms.max(1.0)) / 2.0).min(settings.acceleration_max);
            }
        }
        self.last_admission = Some(now);

        if factor > 1.0 {
            (dx * factor, dy * factor)
        } else {
            (dx, dy)
        }
    }

    /// Advance every command to `now` and write the summed delta.
    pub fn step<T: ScrollTree>(&mut self, tree: &mut T, now: Instant, period: Duration) -> TickReport {
        let mut total_x: i64 = 0;
        let mut total_y: i64 = 0;

        self.commands.retain_mut(|command| {
            let step = command.advance(now);
            total_x = total_x.saturating_add(step.dx);
            total_y = total_y.saturating_add(step.dy);
            !step.finished
        });

        if self.exhausted.x {
            total_x = 0;
        }
        if self.exhausted.y {
            total_y = 0;
        }

        let node = self.target.node(tree);
        let moved_x = write_axis(tree, node, Axis::X, total_x, &mut self.exhausted.x);
        let moved_y = write_axis(tree, node, Axis::Y, total_y, &mut self.exhausted.y);

        // an axis no remaining command moves counts as exhausted
        let settled_x = self.exhausted.x || self.commands.iter().all(|c| c.target().0 == 0.0);
        let settled_y = self.exhausted.y || self.commands.iter().all(|c| c.target().1 == 0.0);
        if settled_x && settled_y {
            self.commands.clear();
        }

        let idle = self.commands.is_empty();
        if idle {
            self.clear();
        } else {
            self.next_tick = Some(now + period);
        }

        trace!(
            target_node = node.0,
            moved_x,
            moved_y,
            active = self.commands.len(),
            "Scroll tick"
        );

        TickReport {
            moved_x,
            moved_y,
            active: self.commands.len(),
            idle,
        }
    }
}

/// Write `delta` along one axis; mark the axis exhausted when the offset
/// did not change.
fn write_axis<T: ScrollTree>(
    tree: &mut T,
    node: NodeId,
    axis: Axis,
    delta: i64,
    exhausted: &mut bool,
) -> i32 {
    if delta == 0 {
        return 0;
    }
    let before = tree.scroll_offset(node, axis);
    let wanted = i64::from(before)
        .saturating_add(delta)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
    tree.set_scroll_offset(node, axis, wanted as i32);
    let moved = tree.scroll_offset(node, axis).saturating_sub(before);
    if moved == 0 {
        *exhausted = true;
    }
    moved
}
