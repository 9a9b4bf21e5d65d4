//! Dispatch of invalid-quality updates.

use std::sync::Arc;
use tracing::{debug, error, warn};

use daq_core::{SourceQuality, TagConfig, TagValue, ValueUpdate, cast, instantiate};
use daq_filters::classify;

use crate::error::DispatchError;
use crate::outputs::Outputs;
use crate::tag_table::{TagCell, TagState};
use crate::time_deadband::TimeDeadband;

/// Filters and sends invalidations.
pub(crate) struct InvalidSender {
    outputs: Arc<Outputs>,
    deadband: Arc<TimeDeadband>,
}

impl InvalidSender {
    pub(crate) fn new(outputs: Arc<Outputs>, deadband: Arc<TimeDeadband>) -> Self {
        Self { outputs, deadband }
    }

    /// Invalidates the tag with `quality`, carrying the value of `update`.
    ///
    /// Returns true if an invalidation was handed to the transport.
    pub(crate) fn invalidate(
        &self,
        cell: &Arc<TagCell>,
        state: &mut TagState,
        update: ValueUpdate,
        quality: SourceQuality,
        now: i64,
    ) -> bool {
        if quality.is_valid() {
            warn!(tag_id = state.config.id, "Invalidation requested with OK quality; ignored");
            return false;
        }
        match self.try_invalidate(cell, state, update, quality, now) {
            Ok(sent) => sent,
            Err(err) => {
                error!(tag_id = state.config.id, error = %err, "Could not send invalid source update to server");
                false
            }
        }
    }

    /// Invalidates the tag keeping its current value and description.
    pub(crate) fn invalidate_quality(
        &self,
        cell: &Arc<TagCell>,
        state: &mut TagState,
        quality: SourceQuality,
        source_timestamp: i64,
        now: i64,
    ) -> bool {
        let update = state.quality_update(source_timestamp);
        self.invalidate(cell, state, update, quality, now)
    }

    /// Invalidates the tag now, bypassing its time deadband.
    ///
    /// A pending deadband value is flushed first. Used when the deadband
    /// itself cannot take the update.
    pub(crate) fn invalidate_now(
        &self,
        state: &mut TagState,
        quality: SourceQuality,
        source_timestamp: i64,
        now: i64,
    ) -> bool {
        if state.schedule.is_some() {
            self.deadband.remove(state);
        }
        let update = state.quality_update(source_timestamp);
        match self.filter(state, update, &quality) {
            Some(candidate) => self.send(state, candidate, quality, now),
            None => false,
        }
    }

    fn try_invalidate(
        &self,
        cell: &Arc<TagCell>,
        state: &mut TagState,
        update: ValueUpdate,
        quality: SourceQuality,
        now: i64,
    ) -> Result<bool, DispatchError> {
        let Some(candidate) = self.filter(state, update, &quality) else {
            return Ok(false);
        };

        if state.config.address.is_time_deadband_enabled() {
            self.deadband.add(cell, state, candidate, quality, now)?;
            return Ok(false);
        }
        if state.schedule.is_some() {
            self.deadband.remove(state);
        }
        Ok(self.send(state, candidate, quality, now))
    }

    /// The update with its value converted, or `None` if it was filtered.
    fn filter(&self, state: &TagState, update: ValueUpdate, quality: &SourceQuality) -> Option<ValueUpdate> {
        let candidate = ValueUpdate {
            value: update.value.as_ref().and_then(|value| convert_or_drop(&state.config, value)),
            ..update
        };

        let filter = classify(&state.config, state.current.as_ref(), &candidate, quality);
        if filter.is_filtered() {
            if candidate.value.is_some() {
                self.outputs.audit_update(&state.config, &candidate, quality, filter);
            } else {
                debug!(tag_id = state.config.id, filter = %filter, "Invalidation without value filtered");
            }
            return None;
        }
        Some(candidate)
    }

    fn send(&self, state: &mut TagState, update: ValueUpdate, quality: SourceQuality, now: i64) -> bool {
        debug!(tag_id = state.config.id, quality = %quality, "Sending invalidation");
        let message = state.apply(update, quality, now);
        let sent = self.outputs.transmit(message);
        self.outputs.record_tag_sent(&state.config);
        sent
    }
}

/// The value cast to the tag's type, or nothing if it cannot be.
fn convert_or_drop(tag: &TagConfig, value: &TagValue) -> Option<TagValue> {
    let converted = cast(value, &tag.data_type).or_else(|| instantiate(value, &tag.data_type));
    if converted.is_none() {
        debug!(tag_id = tag.id, value = %value, "Invalid value not convertible; sending without value");
    }
    converted
}
