//! Prelude for daq-scheduler.

pub use crate::error::{TimerError, TimerResult};
pub use crate::timer::{TaskHandle, TaskId, TimerService, TimerStats};
