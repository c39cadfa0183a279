//! Input normalizer
//!
//! Typed wheel and key records built once at the host boundary, and the
//! conversion of both into pixel deltas independent of the input device.

use std::time::{Duration, Instant};

use crate::config::ScrollSettings;
use crate::dom::{NodeId, NodeKind, ScrollMetrics};

/// Delta reported by a classic wheel for one notch
pub const WHEEL_NOTCH: f64 = 120.0;

/// Deltas up to this size come from high resolution devices reporting units
const UNIT_DELTA_THRESHOLD: f64 = 1.2;

/// Wheel silence after which touchpad detection starts over
const TOUCHPAD_RESET: Duration = Duration::from_secs(1);

/// A wheel event. Positive deltas move the content down/right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Node the event was dispatched to
    pub target: NodeId,
    pub delta_x: f64,
    pub delta_y: f64,
}

impl WheelInput {
    pub fn new(target: NodeId, delta_x: f64, delta_y: f64) -> Self {
        Self {
            target,
            delta_x,
            delta_y,
        }
    }
}

/// Convert raw wheel deltas into pixels, one notch being `step_size` pixels
pub fn normalize_wheel(delta_x: f64, delta_y: f64, step_size: f64) -> (f64, f64) {
    (
        normalize_axis(delta_x, step_size),
        normalize_axis(delta_y, step_size),
    )
}

#[inline]
fn normalize_axis(delta: f64, step_size: f64) -> f64 {
    if delta.abs() > UNIT_DELTA_THRESHOLD {
        delta / WHEEL_NOTCH * step_size
    } else {
        delta * step_size
    }
}

/// Tells touchpads from notched wheels by the last three vertical deltas:
/// notched wheels only ever report multiples of [`WHEEL_NOTCH`].
#[derive(Debug, Clone)]
pub struct TouchpadDetector {
    deltas: [f64; 3],
    last_event: Option<Instant>,
}

impl Default for TouchpadDetector {
    fn default() -> Self {
        Self {
            deltas: [WHEEL_NOTCH; 3],
            last_event: None,
        }
    }
}

impl TouchpadDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a vertical delta and report whether the device looks like a touchpad
    pub fn observe(&mut self, delta_y: f64, now: Instant) -> bool {
        if let Some(last) = self.last_event {
            if now.saturating_duration_since(last) >= TOUCHPAD_RESET {
                self.deltas = [WHEEL_NOTCH; 3];
            }
        }
        self.last_event = Some(now);

        if delta_y == 0.0 {
            return false;
        }
        self.deltas.rotate_left(1);
        self.deltas[2] = delta_y.abs();
        !self.deltas.iter().all(|d| d % WHEEL_NOTCH == 0.0)
    }
}

/// Keys the keyboard path understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    PageUp,
    PageDown,
    Home,
    End,
    Other(u32),
}

impl Key {
    /// Map a DOM key code
    pub fn from_code(code: u32) -> Self {
        match code {
            32 => Key::Space,
            33 => Key::PageUp,
            34 => Key::PageDown,
            35 => Key::End,
            36 => Key::Home,
            37 => Key::Left,
            38 => Key::Up,
            39 => Key::Right,
            40 => Key::Down,
            other => Key::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// A chord the page or the browser owns. Shift only counts as one
    /// outside of shift+space.
    #[inline]
    pub fn is_chord(&self, key: Key) -> bool {
        self.ctrl || self.alt || self.meta || (self.shift && key != Key::Space)
    }
}

/// A key-down event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Focused node the event was dispatched to
    pub target: NodeId,
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(target: NodeId, key: Key, modifiers: Modifiers) -> Self {
        Self {
            target,
            key,
            modifiers,
        }
    }
}

/// Whether a key event must be left to the host untouched
pub fn key_passes_through(input: &KeyInput, kind: NodeKind, editable: bool) -> bool {
    editable
        || kind.captures_keys()
        || input.modifiers.is_chord(input.key)
        || (kind == NodeKind::Button && input.key == Key::Space)
}

/// Pixel delta a key asks for, relative to the element being scrolled.
///
/// `client_height` is the visible height of that element (the viewport for
/// the page). Returns `None` for keys that do not scroll.
pub fn key_delta(
    key: Key,
    shift: bool,
    metrics: &ScrollMetrics,
    client_height: i32,
    settings: &ScrollSettings,
) -> Option<(f64, f64)> {
    let page = settings.space_scroll * client_height as f64;
    let delta = match key {
        Key::Up => (0.0, -settings.arrow_scroll),
        Key::Down => (0.0, settings.arrow_scroll),
        Key::Left => (-settings.arrow_scroll, 0.0),
        Key::Right => (settings.arrow_scroll, 0.0),
        Key::Space => (0.0, if shift { -page } else { page }),
        Key::PageUp => (0.0, -page),
        Key::PageDown => (0.0, page),
        Key::Home => (0.0, -(metrics.scroll_top as f64)),
        Key::End => {
            let remaining = metrics.scroll_height - metrics.scroll_top - client_height;
            (0.0, remaining.max(0) as f64)
        }
        Key::Other(_) => return None,
    };
    Some(delta)
}
