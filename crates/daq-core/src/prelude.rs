//! Prelude for daq-core.
//!
//! Re-exports the types most code touching the pipeline needs.
//!
//! ```rust
//! use daq_core::prelude::*;
//!
//! let quality = SourceQuality::with_description(QualityCode::DataUnavailable, "link down");
//! assert!(!quality.is_valid());
//! ```

pub use crate::convert::{cast, instantiate, is_convertible};
pub use crate::equipment::{EquipmentConfig, SubEquipmentConfig};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::filter::FilterType;
pub use crate::message::{CommFaultState, FilteredValue, OutgoingMessage};
pub use crate::quality::{QualityCode, SourceQuality};
pub use crate::tag::{
    CurrentValue, Priority, TagAddress, TagConfig, TagId, ValueDeadbandType, ValueUpdate,
};
pub use crate::time::now_millis;
pub use crate::transport::{
    DiscardAudit, DynamicDeadbandTracker, FilterMessageSender, NoDynamicDeadband, ProcessMessageSender,
    TransportError,
};
pub use crate::value::{DataType, TagValue};
