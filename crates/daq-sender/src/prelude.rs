//! Prelude for daq-sender.
//!
//! ```rust
//! use daq_sender::prelude::*;
//!
//! let config = SenderConfig::builder().alive_filtering(true).build();
//! assert!(config.is_ok());
//! ```

pub use crate::config::{SenderConfig, SenderConfigBuilder};
pub use crate::error::{SenderError, SenderResult};
pub use crate::report::ChangeReport;
pub use crate::sender::{EquipmentMessageSender, EquipmentMessageSenderBuilder};
pub use crate::stats::SenderStatsSnapshot;
