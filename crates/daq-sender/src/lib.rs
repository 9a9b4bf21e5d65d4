//! # daq-sender
//!
//! Equipment message sender: the last stage of a DAQ process before values
//! leave for the server.
//!
//! Drivers report raw readings and quality changes for the tags of one
//! equipment. The sender validates each reading, converts it to the tag's
//! declared type, drops what is stale or not worth sending, rate-limits tags
//! with a time deadband, and hands the rest to a transport. Everything it
//! drops is reported to an audit channel with the reason.
//!
//! ## Architecture
//!
//! - [`sender`] - [`EquipmentMessageSender`], the facade drivers call
//! - `valid` / `invalid` - dispatch of valid and invalid-quality updates
//! - `time_deadband` - per-tag rate limiting on a shared timer thread
//! - `alive` - equipment and sub-equipment heartbeats
//! - `comm_fault` - communication fault reporting
//! - [`config`] - sender options
//! - [`stats`] - activity counters
//! - [`report`] - outcome of configuration changes
//! - [`error`] - error types
//!
//! ## Concurrency
//!
//! Every tag has its own lock, held from the filter decision until the
//! message is handed to the transport. Updates for one tag are therefore
//! applied in order and never interleave with a time deadband flush of that
//! tag; different tags proceed in parallel.
//!
//! ## Example
//!
//! ```rust
//! use daq_core::prelude::*;
//! use daq_sender::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Stdout;
//!
//! impl ProcessMessageSender for Stdout {
//!     fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
//!         println!("{} = {:?}", message.name, message.value);
//!         Ok(())
//!     }
//!
//!     fn send_equipment_state(&self, state: &CommFaultState) -> Result<(), TransportError> {
//!         println!("{} = {}", state.name, state.value);
//!         Ok(())
//!     }
//! }
//!
//! let equipment = EquipmentConfig::new(1, "BOILER")
//!     .with_tag(TagConfig::new(7, "BOILER.TEMP", DataType::Double).with_range(Some(0.0), Some(120.0)));
//!
//! let sender = EquipmentMessageSender::builder(equipment)
//!     .transport(Arc::new(Stdout))
//!     .build()?;
//!
//! assert!(sender.update(7, ValueUpdate::now(21.5))?);
//! // Same value again: filtered as a repeat.
//! assert!(!sender.update(7, ValueUpdate::now(21.5))?);
//! sender.shutdown();
//! # Ok::<(), daq_sender::SenderError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod alive;
mod comm_fault;
pub mod config;
pub mod error;
mod invalid;
mod outputs;
pub mod prelude;
pub mod report;
pub mod sender;
pub mod stats;
mod tag_table;
mod time_deadband;
mod valid;

pub use alive::{ALIVE_NAME_SUFFIX, ALIVE_OVERWRITTEN_DESCRIPTION};
pub use config::{DEFAULT_TIMER_THREAD_NAME, SenderConfig, SenderConfigBuilder};
pub use error::{SenderError, SenderResult};
pub use report::ChangeReport;
pub use sender::{EquipmentMessageSender, EquipmentMessageSenderBuilder};
pub use stats::SenderStatsSnapshot;
