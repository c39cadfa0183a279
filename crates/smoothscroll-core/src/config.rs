use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::exclusion::split_patterns;
use crate::scroll::easing::Pulse;

/// Shortest period between two animation frames, whatever the framerate.
pub const MIN_FRAME_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Idle poll interval of the terminal host in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

/// Scroll engine settings.
///
/// Field names are snake_case in the TOML file; the camelCase aliases accept
/// the settings message delivered to the engine at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Animation frames per second [Hz]
    #[serde(default = "default_framerate")]
    pub framerate: u32,
    /// Duration of one scroll animation [ms]
    #[serde(default = "default_animation_time", alias = "animationTime")]
    pub animation_time: u64,
    /// Pixels scrolled per wheel notch
    #[serde(default = "default_step_size", alias = "stepSize")]
    pub step_size: f64,
    /// Shape animations with the pulse curve instead of linear progress
    #[serde(default = "default_true", alias = "pulseAlgorithm")]
    pub pulse_algorithm: bool,
    /// Ratio of the decay tail to the acceleration phase
    #[serde(default = "default_pulse_scale", alias = "pulseScale")]
    pub pulse_scale: f64,
    /// Window [ms] in which consecutive requests accelerate
    #[serde(default = "default_acceleration_delta", alias = "accelerationDelta")]
    pub acceleration_delta: u64,
    /// Upper bound of the acceleration factor (1 disables acceleration)
    #[serde(default = "default_acceleration_max", alias = "accelerationMax")]
    pub acceleration_max: f64,
    /// Animate keyboard scrolling
    #[serde(default = "default_true", alias = "keyboardSupport")]
    pub keyboard_support: bool,
    /// Pixels scrolled per arrow key press
    #[serde(default = "default_arrow_scroll", alias = "arrowScroll")]
    pub arrow_scroll: f64,
    /// Fraction of the client height scrolled by space and page keys
    #[serde(default = "default_space_scroll", alias = "spaceScroll")]
    pub space_scroll: f64,
    /// Animate touchpad wheel events too
    #[serde(default = "default_true", alias = "touchpadSupport")]
    pub touchpad_support: bool,
    /// Keep fixed page backgrounds (false switches them to scrolling)
    #[serde(default = "default_true", alias = "fixedBackground")]
    pub fixed_background: bool,
    /// Pages the engine stays away from
    #[serde(
        default,
        alias = "excludedHostPatterns",
        deserialize_with = "deserialize_patterns"
    )]
    pub excluded: Vec<String>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            framerate: default_framerate(),
            animation_time: default_animation_time(),
            step_size: default_step_size(),
            pulse_algorithm: default_true(),
            pulse_scale: default_pulse_scale(),
            acceleration_delta: default_acceleration_delta(),
            acceleration_max: default_acceleration_max(),
            keyboard_support: default_true(),
            arrow_scroll: default_arrow_scroll(),
            space_scroll: default_space_scroll(),
            touchpad_support: default_true(),
            fixed_background: default_true(),
            excluded: Vec::new(),
        }
    }
}

impl ScrollSettings {
    /// Parse a settings message (JSON) as delivered by the settings store
    pub fn from_message(message: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(message)?)
    }

    /// Reject settings the engine cannot animate with
    pub fn validate(&self) -> crate::Result<()> {
        if self.framerate == 0 {
            return Err(crate::Error::InvalidFramerate(self.framerate));
        }
        if self.animation_time == 0 {
            return Err(crate::Error::Config(
                "animation_time must be greater than zero".to_string(),
            ));
        }
        if !(self.step_size.is_finite() && self.step_size > 0.0) {
            return Err(crate::Error::Config(format!(
                "step_size must be a positive number, got {}",
                self.step_size
            )));
        }
        if !(self.pulse_scale.is_finite() && self.pulse_scale > 0.0) {
            return Err(crate::Error::Config(format!(
                "pulse_scale must be a positive number, got {}",
                self.pulse_scale
            )));
        }
        if !Pulse::new(self.pulse_scale).is_well_formed() {
            return Err(crate::Error::Config(format!(
                "pulse_scale {} is too small to calibrate the curve",
                self.pulse_scale
            )));
        }
        if !self.acceleration_max.is_finite() {
            return Err(crate::Error::Config(
                "acceleration_max must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Animation duration of one command
    #[inline]
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_time)
    }

    /// Period between two ticks of a running queue
    #[inline]
    pub fn frame_period(&self) -> Duration {
        if self.framerate == 0 {
            return MIN_FRAME_PERIOD;
        }
        Duration::from_secs_f64(1.0 / self.framerate as f64).max(MIN_FRAME_PERIOD)
    }

    /// Whether rapid requests should be accelerated
    #[inline]
    pub fn accelerates(&self) -> bool {
        self.acceleration_max > 1.0
    }
}

// Accept either a list or the legacy comma/newline separated string
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct PatternsVisitor;

    impl<'de> Visitor<'de> for PatternsVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a list of host patterns or a comma separated string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Vec<String>, E>
        where
            E: de::Error,
        {
            split_patterns(value).map_err(E::custom)
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Vec<String>, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut patterns = Vec::new();
            while let Some(pattern) = seq.next_element::<String>()? {
                let pattern = pattern.trim();
                if !pattern.is_empty() {
                    patterns.push(pattern.to_string());
                }
            }
            Ok(patterns)
        }
    }

    deserializer.deserialize_any(PatternsVisitor)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_framerate() -> u32 {
    150
}

fn default_animation_time() -> u64 {
    400
}

fn default_step_size() -> f64 {
    120.0
}

fn default_pulse_scale() -> f64 {
    4.0
}

fn default_acceleration_delta() -> u64 {
    20
}

fn default_acceleration_max() -> f64 {
    1.0
}

fn default_arrow_scroll() -> f64 {
    50.0
}

fn default_space_scroll() -> f64 {
    0.9
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/smoothscroll/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("smoothscroll")
            .join("config.toml")
    }
}
