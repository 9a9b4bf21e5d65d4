//! Error types for the equipment message sender.

use daq_core::{ConfigError, TagId};
use daq_scheduler::TimerError;
use thiserror::Error;

/// Errors returned to callers of [`crate::EquipmentMessageSender`].
///
/// Problems with an update itself (bad value, future timestamp, transport
/// failure) never surface here: they turn into invalidations or log entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SenderError {
    /// The tag id is not configured on this equipment.
    #[error("Tag {0} is not configured on this equipment")]
    TagNotFound(TagId),

    /// The tag name is not configured on this equipment.
    #[error("Tag name '{0}' is not configured on this equipment")]
    UnknownTagName(String),

    /// A tag with this id is already configured.
    #[error("Tag {0} is already configured")]
    TagAlreadyExists(TagId),

    /// The sender was shut down.
    #[error("Equipment message sender is shut down")]
    ShutDown,

    /// Invalid equipment or sender configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The time deadband timer could not be started.
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),
}

impl SenderError {
    /// Shorthand for an invalid configuration.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::Config(ConfigError::invalid(msg))
    }
}

/// Result type for sender operations.
pub type SenderResult<T> = std::result::Result<T, SenderError>;

/// Unexpected failure while dispatching an update.
///
/// Never leaves the crate: the dispatchers turn it into an invalidation or a
/// log entry.
#[derive(Debug, Error)]
pub(crate) enum DispatchError {
    #[error("value {value} could not be converted to {data_type}")]
    Conversion { value: String, data_type: String },

    #[error("time deadband could not be scheduled: {0}")]
    Schedule(#[from] TimerError),
}
