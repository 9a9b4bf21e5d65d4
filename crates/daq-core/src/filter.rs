//! Filter outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an update was (or was not) withheld from the server.
///
/// Every variant except [`FilterType::NoFiltering`] means the update went to
/// the audit channel instead of the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterType {
    /// Same invalid quality, description and value as the current state.
    RepeatedInvalid,
    /// Numeric change within the configured value deadband.
    ValueDeadband,
    /// Same value, description and valid quality as the current state.
    RepeatedValue,
    /// Coalesced by the per-tag time deadband.
    TimeDeadband,
    /// Timestamp not newer than the current value's.
    OldUpdate,
    /// Update must be sent.
    NoFiltering,
}

impl FilterType {
    /// Numeric code used by the audit channel.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::RepeatedInvalid => 0,
            Self::ValueDeadband => 1,
            Self::RepeatedValue => 2,
            Self::TimeDeadband => 3,
            Self::OldUpdate => 4,
            Self::NoFiltering => 5,
        }
    }

    /// Looks up a filter type by its audit number.
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::all().find(|f| f.number() == number)
    }

    /// True if the update must not reach the transport.
    #[must_use]
    pub const fn is_filtered(self) -> bool {
        !matches!(self, Self::NoFiltering)
    }

    /// All filter types in audit-number order.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::RepeatedInvalid,
            Self::ValueDeadband,
            Self::RepeatedValue,
            Self::TimeDeadband,
            Self::OldUpdate,
            Self::NoFiltering,
        ]
        .into_iter()
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RepeatedInvalid => "REPEATED_INVALID",
            Self::ValueDeadband => "VALUE_DEADBAND",
            Self::RepeatedValue => "REPEATED_VALUE",
            Self::TimeDeadband => "TIME_DEADBAND",
            Self::OldUpdate => "OLD_UPDATE",
            Self::NoFiltering => "NO_FILTERING",
        };
        write!(f, "{name}")
    }
}
