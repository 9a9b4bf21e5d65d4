//! Shared timer thread driving independent periodic tasks.
//!
//! A [`TimerService`] owns one background thread. Any number of periodic
//! tasks can be registered on it, each with its own initial delay and
//! period, and each returning a [`TaskHandle`] that cancels it.
//!
//! # Guarantees
//!
//! - Tasks run on the timer thread, one at a time
//! - A cancelled task is never started again; a run already in progress
//!   finishes normally
//! - A panicking task is logged and stays scheduled; the timer thread survives
//! - Dropping the service (or calling [`TimerService::shutdown`]) cancels all
//!   tasks and joins the thread
//!
//! # Example
//!
//! ```
//! use daq_scheduler::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//!
//! let timer = TimerService::start("example-timer")?;
//! let ticks = Arc::new(AtomicU32::new(0));
//! let counter = Arc::clone(&ticks);
//!
//! let handle = timer.schedule_at_fixed_rate(Duration::ZERO, Duration::from_millis(5), move || {
//!     counter.fetch_add(1, Ordering::Relaxed);
//! })?;
//!
//! std::thread::sleep(Duration::from_millis(30));
//! handle.cancel();
//! timer.shutdown();
//! assert!(ticks.load(Ordering::Relaxed) >= 1);
//! # Ok::<(), daq_scheduler::TimerError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod error;
pub mod prelude;
pub mod timer;

pub use error::{TimerError, TimerResult};
pub use timer::{TaskHandle, TaskId, TimerService, TimerStats};
