//! Shared test utilities for the DAQ pipeline crates.
//!
//! # Modules
//!
//! - [`mock`] - Recording transport, audit and tracker doubles
//! - [`fixtures`] - Equipment and tag fixtures
//! - [`mod@wait`] - Polling for effects of background threads
//! - [`logging`] - Test log output
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! daq-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use daq_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod logging;
pub mod prelude;
pub mod wait;

#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use logging::init_test_tracing;
pub use wait::wait_until;
