//! Frame scheduling on tokio time
//!
//! Animation frames are not a fixed interval: the driver sleeps until the
//! earliest deadline of any running queue, and not at all while idle.

mod service;

pub use service::{run_until_idle, DriverEvent, FrameDriver, HostEvent};
