//! Equipment and sub-equipment alive heartbeats.
//!
//! An alive tag is sent with high priority, without guaranteed delivery and
//! with a time-to-live equal to its alive interval. With alive filtering on,
//! a heartbeat arriving less than half an interval after the last one sent
//! for the same tag is dropped.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use daq_core::{DataType, OutgoingMessage, Priority, SourceQuality, TagId, TagValue, ValueUpdate, cast};

use crate::outputs::Outputs;
use crate::tag_table::TagState;

/// Description sent when the DAQ replaces a driver-supplied alive value.
pub const ALIVE_OVERWRITTEN_DESCRIPTION: &str =
    "Alive value overwritten by the DAQ with the source timestamp";

/// Suffix of the generated name of an alive tag that is not configured as a tag.
pub const ALIVE_NAME_SUFFIX: &str = ":ALIVE";

/// One heartbeat to send.
pub(crate) struct Heartbeat<'a> {
    pub(crate) tag_id: TagId,
    pub(crate) interval_ms: u64,
    pub(crate) equipment_name: &'a str,
    /// Update supplied by the driver, if the heartbeat came through `update`.
    pub(crate) update: Option<&'a ValueUpdate>,
    pub(crate) timestamp: i64,
}

pub(crate) struct AliveSender {
    filtering: bool,
    last_sent: Mutex<HashMap<TagId, i64>>,
    outputs: Arc<Outputs>,
}

impl AliveSender {
    pub(crate) fn new(filtering: bool, outputs: Arc<Outputs>) -> Self {
        Self { filtering, last_sent: Mutex::new(HashMap::new()), outputs }
    }

    /// Sends a heartbeat unless alive filtering suppresses it.
    ///
    /// `state` is the locked alive tag if it is configured as a tag; its
    /// current value is updated on send.
    pub(crate) fn send(&self, heartbeat: &Heartbeat<'_>, state: Option<&mut TagState>, now: i64) -> bool {
        let mut last_sent = self.last_sent.lock();
        if let Some(previous) = last_sent.get(&heartbeat.tag_id) {
            if self.filtering && is_too_early(*previous, heartbeat.timestamp, heartbeat.interval_ms) {
                self.outputs.stats.inc_alive_suppressed();
                trace!(tag_id = heartbeat.tag_id, previous, "Alive suppressed by alive filtering");
                return false;
            }
        }

        let message = match state {
            Some(state) => configured_message(heartbeat, state, now),
            None => unconfigured_message(heartbeat, now),
        };
        if !self.outputs.transmit(message) {
            return false;
        }
        last_sent.insert(heartbeat.tag_id, heartbeat.timestamp);
        self.outputs.stats.inc_alive_sent();
        debug!(tag_id = heartbeat.tag_id, timestamp = heartbeat.timestamp, "Alive sent");
        true
    }
}

fn is_too_early(previous: i64, timestamp: i64, interval_ms: u64) -> bool {
    let half_interval = i64::try_from(interval_ms.div_ceil(2)).unwrap_or(i64::MAX);
    timestamp.saturating_sub(previous) < half_interval
}

fn configured_message(heartbeat: &Heartbeat<'_>, state: &mut TagState, now: i64) -> OutgoingMessage {
    let data_type = &state.config.data_type;
    let supplied = heartbeat
        .update
        .and_then(|update| update.value.as_ref().and_then(|value| cast(value, data_type)).map(|v| (v, update)));

    let update = match supplied {
        Some((value, update)) => ValueUpdate {
            value: Some(value),
            value_description: update.value_description.clone(),
            source_timestamp: heartbeat.timestamp,
        },
        None => {
            let description = if heartbeat.update.is_some() {
                ALIVE_OVERWRITTEN_DESCRIPTION.to_string()
            } else {
                String::new()
            };
            ValueUpdate {
                value: timestamp_value(state.config.id, data_type, heartbeat.timestamp),
                value_description: description,
                source_timestamp: heartbeat.timestamp,
            }
        }
    };

    let mut message = state.apply(update, SourceQuality::ok(), now);
    alive_delivery(&mut message, heartbeat.interval_ms);
    message
}

fn unconfigured_message(heartbeat: &Heartbeat<'_>, now: i64) -> OutgoingMessage {
    let mut message = OutgoingMessage {
        id: heartbeat.tag_id,
        name: format!("{}{ALIVE_NAME_SUFFIX}", heartbeat.equipment_name),
        control_tag: true,
        value: Some(TagValue::Long(heartbeat.timestamp)),
        value_description: String::new(),
        quality: SourceQuality::ok(),
        source_timestamp: heartbeat.timestamp,
        daq_timestamp: now,
        priority: Priority::High,
        guaranteed_delivery: false,
        time_to_live_ms: None,
    };
    alive_delivery(&mut message, heartbeat.interval_ms);
    message
}

fn alive_delivery(message: &mut OutgoingMessage, interval_ms: u64) {
    message.priority = Priority::High;
    message.guaranteed_delivery = false;
    message.time_to_live_ms = Some(interval_ms);
}

/// The alive timestamp expressed in the alive tag's data type.
fn timestamp_value(tag_id: TagId, data_type: &DataType, timestamp: i64) -> Option<TagValue> {
    let value = match data_type {
        DataType::Long => Some(TagValue::Long(timestamp)),
        DataType::Integer => i32::try_from(timestamp.rem_euclid(i64::from(i32::MAX))).ok().map(TagValue::Integer),
        DataType::Short => i16::try_from(timestamp.rem_euclid(i64::from(i16::MAX))).ok().map(TagValue::Short),
        DataType::Byte => i8::try_from(timestamp.rem_euclid(i64::from(i8::MAX))).ok().map(TagValue::Byte),
        DataType::String => Some(TagValue::String(timestamp.to_string())),
        _ => None,
    };
    if value.is_none() {
        warn!(tag_id, data_type = %data_type, "Alive tag type cannot hold a timestamp; sending without value");
    }
    value
}
