//! Tag configuration, incoming updates and current-value snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::convert::cast;
use crate::quality::SourceQuality;
use crate::value::{DataType, TagValue};

/// Unique identifier of a tag.
pub type TagId = u64;

/// Transport priority of a tag's messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    /// Low priority, eligible for dynamic deadband.
    #[default]
    Low,
    /// Medium priority, eligible for dynamic deadband.
    Medium,
    /// Highest transport priority.
    High,
}

impl Priority {
    /// Numeric priority used by the transport.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Low => 2,
            Self::Medium => 4,
            Self::High => 7,
        }
    }

    /// Low and medium priority tags take part in dynamic time deadband.
    #[must_use]
    pub const fn allows_dynamic_deadband(self) -> bool {
        matches!(self, Self::Low | Self::Medium)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// How the value deadband of a numeric tag is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueDeadbandType {
    /// No value deadband.
    #[default]
    None,
    /// Filter if `|new - current| < deadband`.
    Absolute,
    /// Filter if the change is below `deadband` percent of the current value.
    Relative,
    /// Like [`Self::Absolute`], but only while the value description is unchanged.
    AbsoluteValueDescrChange,
    /// Like [`Self::Relative`], but only while the value description is unchanged.
    RelativeValueDescrChange,
}

impl ValueDeadbandType {
    /// True if the pipeline applies a value deadband at all.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::None)
    }

    /// True for the percentage based variants.
    #[must_use]
    pub const fn is_relative(self) -> bool {
        matches!(self, Self::Relative | Self::RelativeValueDescrChange)
    }

    /// True for the variants that are suspended by a description change.
    #[must_use]
    pub const fn requires_unchanged_description(self) -> bool {
        matches!(self, Self::AbsoluteValueDescrChange | Self::RelativeValueDescrChange)
    }
}

/// Transport and filtering settings of a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagAddress {
    /// Transport priority.
    pub priority: Priority,
    /// Ask the transport for guaranteed delivery.
    pub guaranteed_delivery: bool,
    /// Message time-to-live in milliseconds; `None` means unlimited.
    pub time_to_live_ms: Option<u64>,
    /// Value deadband variant.
    pub value_deadband_type: ValueDeadbandType,
    /// Value deadband magnitude (absolute units or percent).
    pub value_deadband: f32,
    /// Minimum spacing between transmissions in milliseconds; 0 disables it.
    pub time_deadband_ms: u32,
    /// Time deadband is configured and not driven by usage.
    pub static_time_deadband: bool,
}

impl Default for TagAddress {
    fn default() -> Self {
        Self {
            priority: Priority::Low,
            guaranteed_delivery: false,
            time_to_live_ms: None,
            value_deadband_type: ValueDeadbandType::None,
            value_deadband: 0.0,
            time_deadband_ms: 0,
            static_time_deadband: false,
        }
    }
}

impl TagAddress {
    /// True if the time deadband is active.
    #[must_use]
    pub fn is_time_deadband_enabled(&self) -> bool {
        self.time_deadband_ms > 0
    }

    /// True if a value deadband is configured with a positive magnitude.
    #[must_use]
    pub fn is_value_deadband_enabled(&self) -> bool {
        self.value_deadband_type.is_enabled() && self.value_deadband > 0.0
    }
}

/// Static configuration of one tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagConfig {
    /// Unique id.
    pub id: TagId,
    /// Unique name.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Lower bound for numeric values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Upper bound for numeric values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Control tags (alive, comm fault) are produced by the DAQ itself.
    #[serde(default)]
    pub control_tag: bool,
    /// Transport and filter settings.
    #[serde(default)]
    pub address: TagAddress,
}

impl TagConfig {
    /// Creates a tag with default address settings and no range.
    #[must_use]
    pub fn new(id: TagId, name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id,
            name: name.into(),
            data_type,
            min_value: None,
            max_value: None,
            control_tag: false,
            address: TagAddress::default(),
        }
    }

    /// Sets the numeric range.
    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Sets the value deadband.
    #[must_use]
    pub fn with_value_deadband(mut self, kind: ValueDeadbandType, deadband: f32) -> Self {
        self.address.value_deadband_type = kind;
        self.address.value_deadband = deadband;
        self
    }

    /// Sets the time deadband interval and whether it is static.
    #[must_use]
    pub fn with_time_deadband(mut self, interval_ms: u32, static_deadband: bool) -> Self {
        self.address.time_deadband_ms = interval_ms;
        self.address.static_time_deadband = static_deadband;
        self
    }

    /// Sets the transport priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.address.priority = priority;
        self
    }

    /// Marks the tag as a control tag.
    #[must_use]
    pub fn as_control_tag(mut self) -> Self {
        self.control_tag = true;
        self
    }

    /// Checks a value against the configured min/max.
    ///
    /// Non-numeric tags and values that cannot be read as numbers are always
    /// in range.
    #[must_use]
    pub fn is_in_range(&self, value: &TagValue) -> bool {
        if !self.data_type.is_numeric() {
            return true;
        }
        let Some(number) = cast(value, &self.data_type).and_then(|v| v.as_f64()) else {
            return true;
        };
        self.min_value.is_none_or(|min| number >= min) && self.max_value.is_none_or(|max| number <= max)
    }

    /// Human readable form of the configured range.
    #[must_use]
    pub fn range_description(&self) -> String {
        let bound = |b: Option<f64>| b.map_or_else(|| "none".to_string(), |v| v.to_string());
        format!("min: {} max: {}", bound(self.min_value), bound(self.max_value))
    }
}

/// One reading delivered by a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueUpdate {
    /// Raw value, possibly absent.
    pub value: Option<TagValue>,
    /// Free text accompanying the value.
    #[serde(default)]
    pub value_description: String,
    /// Source timestamp in epoch milliseconds.
    pub source_timestamp: i64,
}

impl ValueUpdate {
    /// Update carrying `value` at `source_timestamp`.
    #[must_use]
    pub fn new(value: impl Into<TagValue>, source_timestamp: i64) -> Self {
        Self {
            value: Some(value.into()),
            value_description: String::new(),
            source_timestamp,
        }
    }

    /// Update without a value, e.g. for a pure quality change.
    #[must_use]
    pub fn without_value(source_timestamp: i64) -> Self {
        Self {
            value: None,
            value_description: String::new(),
            source_timestamp,
        }
    }

    /// Update carrying `value` stamped with the current time.
    #[must_use]
    pub fn now(value: impl Into<TagValue>) -> Self {
        Self::new(value, crate::time::now_millis())
    }

    /// Sets the value description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.value_description = description.into();
        self
    }
}

/// Snapshot of the value a tag currently holds.
///
/// Copied by value whenever a decision needs to be remembered, e.g. the last
/// value handed to the transport by the time deadband.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentValue {
    /// Value after casting.
    pub value: Option<TagValue>,
    /// Value description.
    pub value_description: String,
    /// Quality of the value.
    pub quality: SourceQuality,
    /// Source timestamp in epoch milliseconds.
    pub source_timestamp: i64,
    /// Time the DAQ accepted the value, in epoch milliseconds.
    pub daq_timestamp: i64,
}

impl CurrentValue {
    /// Re-expresses the snapshot as an update, for filter comparisons.
    #[must_use]
    pub fn to_update(&self) -> ValueUpdate {
        ValueUpdate {
            value: self.value.clone(),
            value_description: self.value_description.clone(),
            source_timestamp: self.source_timestamp,
        }
    }
}
