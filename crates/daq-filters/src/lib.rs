//! Update validation and filter decisions for the DAQ equipment message pipeline.
//!
//! Both stages are pure: they look at a tag's configuration, its current
//! value and an incoming update, and return a verdict. Acting on the verdict
//! (invalidating, auditing, buffering, sending) is the sender's job.
//!
//! # Overview
//!
//! - **Validator**: rejects updates with a future timestamp, an inconvertible
//!   value or a numeric value outside the configured range
//! - **Filter engine**: classifies an update as stale, within the value
//!   deadband, a repeat, or something that must be sent
//! - **Deadband**: the absolute/relative value deadband arithmetic
//!
//! # Example
//!
//! ```
//! use daq_core::prelude::*;
//! use daq_filters::prelude::*;
//!
//! let tag = TagConfig::new(1, "EQ.TEMP", DataType::Double)
//!     .with_value_deadband(ValueDeadbandType::Absolute, 0.5);
//! let current = CurrentValue {
//!     value: Some(TagValue::Double(20.0)),
//!     value_description: String::new(),
//!     quality: SourceQuality::ok(),
//!     source_timestamp: 1_000,
//!     daq_timestamp: 1_000,
//! };
//!
//! let small_step = ValueUpdate::new(20.2, 2_000);
//! assert_eq!(
//!     classify(&tag, Some(&current), &small_step, &SourceQuality::ok()),
//!     FilterType::ValueDeadband
//! );
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod deadband;
pub mod prelude;
pub mod validator;
pub mod value_filter;

pub use deadband::is_value_deadband_filtered;
pub use validator::{DEFAULT_MAX_FUTURE_SKEW_MS, Rejection, UpdateValidator};
pub use value_filter::{classify, is_older_update};
