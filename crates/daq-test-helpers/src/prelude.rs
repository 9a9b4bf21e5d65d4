//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use daq_test_helpers::prelude::*;
//! ```

pub use crate::logging::init_test_tracing;
pub use crate::wait::wait_until;

#[cfg(feature = "mock")]
pub use crate::mock::{RecordingAudit, RecordingTracker, RecordingTransport, TrackerCall};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::*;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
