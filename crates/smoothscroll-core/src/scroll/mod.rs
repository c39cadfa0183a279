//! Scroll animation core
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pulse curve and linear progress
//! - `timing` - Clocks and progress calculation
//! - `command` - One admitted scroll request
//! - `guard` - Direction guard
//!
//! ## L3 Molecular Layer
//! - `queue` - Per-target command queue with tick stepping and edge detection
//!
//! # Usage
//!
//! ```ignore
//! use smoothscroll_core::scroll::{Easing, ScrollQueue};
//!
//! let mut queue = ScrollQueue::new(ScrollTarget::Page);
//! queue.admit(0.0, 120.0, clock.now(), &settings, Easing::from_settings(&settings));
//!
//! // whenever the deadline passes
//! while let Some(deadline) = queue.deadline() {
//!     sleep_until(deadline);
//!     queue.step(&mut document, clock.now(), settings.frame_period());
//! }
//! ```

// L4 Atomic Layer
pub mod command;
pub mod easing;
pub mod guard;
pub mod timing;

// L3 Molecular Layer
pub mod queue;

pub use command::{CommandStep, ScrollCommand};
pub use easing::{Easing, Pulse};
pub use guard::{Direction, DirectionGuard};
pub use queue::{Exhausted, ScrollQueue, TickReport};
pub use timing::{Clock, ManualClock, SystemClock, TokioClock};
