//! # daq-core
//!
//! Shared model for the DAQ equipment message pipeline.
//!
//! Everything the pipeline reads, decides on and emits is defined here:
//! tag configuration, incoming readings, quality codes, filter outcomes and
//! the messages handed to the transport and audit collaborators.
//!
//! ## Architecture
//!
//! - [`value`] - Tag values and declared data types
//! - [`convert`] - Casting raw values to a tag's declared type
//! - [`quality`] - Quality codes attached to every value
//! - [`filter`] - Filter outcomes reported to the audit channel
//! - [`tag`] - Tag configuration, incoming updates and current-value snapshots
//! - [`message`] - Messages produced for transport and audit
//! - [`equipment`] - Equipment and sub-equipment configuration
//! - [`transport`] - Interfaces of the transport, audit and usage-tracking collaborators
//! - [`time`] - Millisecond timestamps
//! - [`error`] - Configuration errors
//!
//! ## Example
//!
//! ```rust
//! use daq_core::prelude::*;
//!
//! let tag = TagConfig::new(1, "BOILER.TEMP", DataType::Double)
//!     .with_range(Some(0.0), Some(120.0));
//!
//! let update = ValueUpdate::new(TagValue::Integer(42), 1_700_000_000_000);
//! let value = update.value.as_ref().and_then(|v| cast(v, &tag.data_type));
//!
//! assert_eq!(value, Some(TagValue::Double(42.0)));
//! assert!(tag.is_in_range(&TagValue::Double(42.0)));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod convert;
pub mod equipment;
pub mod error;
pub mod filter;
pub mod message;
pub mod prelude;
pub mod quality;
pub mod tag;
pub mod time;
pub mod transport;
pub mod value;

pub use convert::{cast, instantiate, is_convertible};
pub use equipment::{EquipmentConfig, SubEquipmentConfig};
pub use error::{ConfigError, ConfigResult};
pub use filter::FilterType;
pub use message::{CommFaultState, FilteredValue, OutgoingMessage};
pub use quality::{QualityCode, SourceQuality};
pub use tag::{CurrentValue, Priority, TagAddress, TagConfig, TagId, ValueDeadbandType, ValueUpdate};
pub use time::now_millis;
pub use transport::{
    DiscardAudit, DynamicDeadbandTracker, FilterMessageSender, NoDynamicDeadband, ProcessMessageSender,
    TransportError,
};
pub use value::{DataType, TagValue};
