//! Utility Module
//!
//! - [`time`]: time sources feeding the playback clock
//! - [`logging`]: platform logger installation
//! - [`task`]: background execution of load tasks

pub mod logging;
pub mod task;
pub mod time;

pub use time::{HostClock, ManualClock, TimeSource};
