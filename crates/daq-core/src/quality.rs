//! Quality codes attached to tag values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a value is (or is not) trustworthy.
///
/// Every code except [`QualityCode::Ok`] marks the value as invalid. The
/// numeric codes are part of the wire format shared with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityCode {
    /// Value is valid.
    #[default]
    Ok,
    /// Numeric value lies outside the configured min/max.
    OutOfBounds,
    /// Value was corrupted at the source.
    ValueCorrupted,
    /// Value cannot be converted to the tag's declared type.
    ConversionError,
    /// Source cannot currently deliver a value.
    DataUnavailable,
    /// Unexpected failure while processing the value.
    Unknown,
    /// The source produced a type the tag does not support.
    UnsupportedType,
    /// The tag's hardware address is wrong.
    IncorrectNativeAddress,
    /// Source timestamp lies too far in the future.
    FutureSourceTimestamp,
}

impl QualityCode {
    /// Numeric wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::OutOfBounds => 1,
            Self::ValueCorrupted => 2,
            Self::ConversionError => 3,
            Self::DataUnavailable => 4,
            Self::Unknown => 5,
            Self::UnsupportedType => 6,
            Self::IncorrectNativeAddress => 7,
            Self::FutureSourceTimestamp => 8,
        }
    }

    /// Looks up a code by its wire number.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        Self::all().find(|c| c.code() == code)
    }

    /// Returns true only for [`QualityCode::Ok`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// All quality codes in wire order.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Ok,
            Self::OutOfBounds,
            Self::ValueCorrupted,
            Self::ConversionError,
            Self::DataUnavailable,
            Self::Unknown,
            Self::UnsupportedType,
            Self::IncorrectNativeAddress,
            Self::FutureSourceTimestamp,
        ]
        .into_iter()
    }
}

impl fmt::Display for QualityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::OutOfBounds => "OUT_OF_BOUNDS",
            Self::ValueCorrupted => "VALUE_CORRUPTED",
            Self::ConversionError => "CONVERSION_ERROR",
            Self::DataUnavailable => "DATA_UNAVAILABLE",
            Self::Unknown => "UNKNOWN",
            Self::UnsupportedType => "UNSUPPORTED_TYPE",
            Self::IncorrectNativeAddress => "INCORRECT_NATIVE_ADDRESS",
            Self::FutureSourceTimestamp => "FUTURE_SOURCE_TIMESTAMP",
        };
        write!(f, "{name}")
    }
}

/// Quality code plus an optional human readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceQuality {
    code: QualityCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl SourceQuality {
    /// Valid quality without description.
    #[must_use]
    pub fn ok() -> Self {
        Self::default()
    }

    /// Quality with the given code and no description.
    #[must_use]
    pub fn new(code: QualityCode) -> Self {
        Self { code, description: None }
    }

    /// Quality with the given code and description.
    #[must_use]
    pub fn with_description(code: QualityCode, description: impl Into<String>) -> Self {
        Self { code, description: Some(description.into()) }
    }

    /// The quality code.
    #[must_use]
    pub fn code(&self) -> QualityCode {
        self.code
    }

    /// The description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns true if the code is [`QualityCode::Ok`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.code.is_valid()
    }
}

impl fmt::Display for SourceQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(desc) => write!(f, "{} ({desc})", self.code),
            None => write!(f, "{}", self.code),
        }
    }
}

impl From<QualityCode> for SourceQuality {
    fn from(code: QualityCode) -> Self {
        Self::new(code)
    }
}
