//! Configuration error types.

use thiserror::Error;

use crate::tag::TagId;

/// Errors raised while loading or validating equipment configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Two tags share the same id.
    #[error("Duplicate tag id: {0}")]
    DuplicateTagId(TagId),

    /// Two tags share the same name.
    #[error("Duplicate tag name: {0}")]
    DuplicateTagName(String),

    /// A tag's minimum lies above its maximum.
    #[error("Invalid range for tag {tag_id}: min {min} > max {max}")]
    InvalidRange {
        /// Offending tag.
        tag_id: TagId,
        /// Configured minimum.
        min: f64,
        /// Configured maximum.
        max: f64,
    },

    /// Any other inconsistent setting.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Creates a parse error from any displayable source.
    #[must_use]
    pub fn parse(err: impl std::fmt::Display) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
