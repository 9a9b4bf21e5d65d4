//! Prelude for daq-filters.

pub use crate::deadband::is_value_deadband_filtered;
pub use crate::validator::{DEFAULT_MAX_FUTURE_SKEW_MS, Rejection, UpdateValidator};
pub use crate::value_filter::{classify, is_older_update};
