//! L4 Atomic Layer: Pure easing functions for scroll animations
//!
//! Maps normalized elapsed time [0, 1] to normalized scroll progress [0, 1].

use crate::config::ScrollSettings;

/// Viscous fluid with a pulse for part and decay for the rest.
///
/// A fixed force is applied over an interval (a damped acceleration), then an
/// exponential bleeds the velocity away over a longer interval. `scale` sets
/// the ratio of the decay tail to the acceleration phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    scale: f64,
    normalize: f64,
}

impl Pulse {
    /// Build the curve for `scale`, calibrated so that `apply(1.0) == 1.0`
    pub fn new(scale: f64) -> Self {
        let mut pulse = Self {
            scale,
            normalize: 1.0,
        };
        pulse.normalize = 1.0 / pulse.raw(1.0);
        pulse
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[inline]
    pub fn normalize(&self) -> f64 {
        self.normalize
    }

    fn raw(&self, x: f64) -> f64 {
        let s = x * self.scale;
        // exp_m1 keeps small scales from cancelling to noise
        if s < 1.0 {
            s + (-s).exp_m1()
        } else {
            // the acceleration phase ended here
            let start = (-1.0f64).exp();
            start - (-(s - 1.0)).exp_m1() * (1.0 - start)
        }
    }

    #[inline]
    pub fn apply(&self, x: f64) -> f64 {
        if x >= 1.0 {
            return 1.0;
        }
        if x <= 0.0 {
            return 0.0;
        }
        (self.raw(x) * self.normalize).clamp(0.0, 1.0)
    }

    /// The curve can be calibrated: `raw(1)` did not underflow
    pub fn is_well_formed(&self) -> bool {
        self.normalize.is_finite() && self.normalize > 0.0
    }
}

impl Default for Pulse {
    fn default() -> Self {
        Self::new(4.0)
    }
}

/// Progress curve of one scroll command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    Pulse(Pulse),
}

impl Easing {
    pub fn from_settings(settings: &ScrollSettings) -> Self {
        if settings.pulse_algorithm {
            Easing::Pulse(Pulse::new(settings.pulse_scale))
        } else {
            Easing::Linear
        }
    }

    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::Pulse(pulse) => pulse.apply(t),
        }
    }
}
