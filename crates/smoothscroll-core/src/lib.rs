pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod input;
pub mod overflow;
pub mod scheduler;
pub mod scroll;

pub use config::{AppConfig, GeneralConfig, ScrollSettings};
pub use engine::{Activation, EventOutcome, SmoothScroller};
pub use error::{Error, Result};
pub use overflow::ScrollTarget;
