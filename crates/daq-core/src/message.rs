//! Messages produced by the pipeline.

use serde::{Deserialize, Serialize};

use crate::filter::FilterType;
use crate::quality::SourceQuality;
use crate::tag::{CurrentValue, Priority, TagConfig, TagId};
use crate::value::TagValue;

/// A tag value ready for the transport.
///
/// Built fresh for every transmission and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Tag id.
    pub id: TagId,
    /// Tag name.
    pub name: String,
    /// True for alive and comm fault tags.
    pub control_tag: bool,
    /// Value, possibly absent for invalid tags.
    pub value: Option<TagValue>,
    /// Value description.
    pub value_description: String,
    /// Quality of the value.
    pub quality: SourceQuality,
    /// Source timestamp in epoch milliseconds.
    pub source_timestamp: i64,
    /// DAQ timestamp in epoch milliseconds.
    pub daq_timestamp: i64,
    /// Transport priority.
    pub priority: Priority,
    /// Ask the transport for guaranteed delivery.
    pub guaranteed_delivery: bool,
    /// Time-to-live in milliseconds; `None` means unlimited.
    pub time_to_live_ms: Option<u64>,
}

impl OutgoingMessage {
    /// Materializes a tag's current value using its address settings.
    #[must_use]
    pub fn from_current(tag: &TagConfig, current: &CurrentValue) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            control_tag: tag.control_tag,
            value: current.value.clone(),
            value_description: current.value_description.clone(),
            quality: current.quality.clone(),
            source_timestamp: current.source_timestamp,
            daq_timestamp: current.daq_timestamp,
            priority: tag.address.priority,
            guaranteed_delivery: tag.address.guaranteed_delivery,
            time_to_live_ms: tag.address.time_to_live_ms,
        }
    }

    /// True if the message carries a valid quality.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.quality.is_valid()
    }
}

/// A value that was withheld from the server, sent to the audit channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredValue {
    /// Tag id.
    pub tag_id: TagId,
    /// Tag name.
    pub tag_name: String,
    /// Value that was filtered.
    pub value: Option<TagValue>,
    /// Value description.
    pub value_description: String,
    /// Quality the value arrived with.
    pub quality: SourceQuality,
    /// Source timestamp in epoch milliseconds.
    pub source_timestamp: i64,
    /// Why the value was filtered.
    pub filter_type: FilterType,
    /// True if a usage driven time deadband was in effect.
    pub dynamic_filtered: bool,
}

/// Up/down state of an equipment or sub-equipment.
///
/// Two states are equal only if all four fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommFaultState {
    /// Comm fault tag id.
    pub tag_id: TagId,
    /// Message name, `"<entity>:COMM_FAULT"`.
    pub name: String,
    /// Value of the comm fault tag.
    pub value: bool,
    /// Optional explanation.
    pub description: Option<String>,
}

impl CommFaultState {
    /// Suffix appended to the entity name.
    pub const NAME_SUFFIX: &'static str = ":COMM_FAULT";

    /// Builds the state for an entity.
    #[must_use]
    pub fn new(tag_id: TagId, entity_name: &str, value: bool, description: Option<String>) -> Self {
        Self {
            tag_id,
            name: format!("{entity_name}{}", Self::NAME_SUFFIX),
            value,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::QualityCode;
    use crate::value::DataType;

    #[test]
    fn test_message_from_current_copies_address() {
        let mut tag = TagConfig::new(9, "EQ.LEVEL", DataType::Double).with_priority(Priority::Medium);
        tag.address.guaranteed_delivery = true;
        tag.address.time_to_live_ms = Some(60_000);
        let current = CurrentValue {
            value: Some(TagValue::Double(2.5)),
            value_description: "ok".into(),
            quality: SourceQuality::with_description(QualityCode::OutOfBounds, "high"),
            source_timestamp: 10,
            daq_timestamp: 11,
        };
        let msg = OutgoingMessage::from_current(&tag, &current);
        assert_eq!(msg.id, 9);
        assert_eq!(msg.priority, Priority::Medium);
        assert!(msg.guaranteed_delivery);
        assert_eq!(msg.time_to_live_ms, Some(60_000));
        assert!(!msg.is_valid());
        assert_eq!(msg.daq_timestamp, 11);
    }

    #[test]
    fn test_comm_fault_name_and_equality() {
        let a = CommFaultState::new(4, "SUBEQ.1", true, Some("x".into()));
        assert_eq!(a.name, "SUBEQ.1:COMM_FAULT");
        assert_eq!(a, CommFaultState::new(4, "SUBEQ.1", true, Some("x".into())));
        assert_ne!(a, CommFaultState::new(4, "SUBEQ.1", true, None));
        assert_ne!(a, CommFaultState::new(4, "SUBEQ.1", false, Some("x".into())));
    }
}
