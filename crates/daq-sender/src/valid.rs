//! Dispatch of valid-quality updates.
//!
//! Order of operations for one update, all under the tag lock:
//!
//! 1. validate (future timestamp, convertibility, range); a rejection
//!    becomes an invalidation
//! 2. cast the value to the tag's data type
//! 3. filter against the current value; filtered updates go to the audit
//!    channel
//! 4. buffer in the time deadband, or send right away

use std::sync::Arc;
use tracing::{debug, error, warn};

use daq_core::{QualityCode, SourceQuality, TagConfig, ValueUpdate, cast, instantiate};
use daq_filters::{UpdateValidator, classify};

use crate::error::DispatchError;
use crate::invalid::InvalidSender;
use crate::outputs::Outputs;
use crate::tag_table::{TagCell, TagState};
use crate::time_deadband::TimeDeadband;

pub(crate) struct ValidSender {
    validator: UpdateValidator,
    outputs: Arc<Outputs>,
    deadband: Arc<TimeDeadband>,
    invalid: Arc<InvalidSender>,
}

impl ValidSender {
    pub(crate) fn new(
        validator: UpdateValidator,
        outputs: Arc<Outputs>,
        deadband: Arc<TimeDeadband>,
        invalid: Arc<InvalidSender>,
    ) -> Self {
        Self { validator, outputs, deadband, invalid }
    }

    /// Returns true if the update was handed to the transport right away.
    pub(crate) fn update(&self, cell: &Arc<TagCell>, state: &mut TagState, update: &ValueUpdate, now: i64) -> bool {
        match self.try_update(cell, state, update, now) {
            Ok(sent) => sent,
            Err(err) => {
                error!(tag_id = state.config.id, error = %err, "Could not send incoming valid source update to server");
                let quality = SourceQuality::with_description(
                    QualityCode::Unknown,
                    format!("Could not send incoming valid source update to server: {err}"),
                );
                self.invalid.invalidate_now(state, quality, update.source_timestamp, now)
            }
        }
    }

    fn try_update(
        &self,
        cell: &Arc<TagCell>,
        state: &mut TagState,
        update: &ValueUpdate,
        now: i64,
    ) -> Result<bool, DispatchError> {
        if let Err(rejection) = self.validator.validate(&state.config, update, now) {
            warn!(
                tag_id = state.config.id,
                quality = %rejection.quality,
                "Update rejected; invalidating tag"
            );
            let sent = if rejection.propagate_value {
                self.invalid.invalidate(cell, state, update.clone(), rejection.quality, now)
            } else {
                self.invalid.invalidate_quality(cell, state, rejection.quality, update.source_timestamp, now)
            };
            return Ok(sent);
        }

        let converted = convert(&state.config, update)?;
        let quality = SourceQuality::ok();

        let filter = classify(&state.config, state.current.as_ref(), &converted, &quality);
        if filter.is_filtered() {
            self.outputs.audit_update(&state.config, &converted, &quality, filter);
            return Ok(false);
        }

        if state.config.address.is_time_deadband_enabled() {
            self.deadband.add(cell, state, converted, quality, now)?;
            return Ok(false);
        }
        if state.schedule.is_some() {
            self.deadband.remove(state);
        }

        let message = state.apply(converted, quality, now);
        let sent = self.outputs.transmit(message);
        self.outputs.record_tag_sent(&state.config);
        debug!(tag_id = state.config.id, sent, "Valid update dispatched");
        Ok(sent)
    }
}

fn convert(tag: &TagConfig, update: &ValueUpdate) -> Result<ValueUpdate, DispatchError> {
    let Some(value) = &update.value else {
        return Ok(update.clone());
    };
    let converted = cast(value, &tag.data_type)
        .or_else(|| instantiate(value, &tag.data_type))
        .ok_or_else(|| DispatchError::Conversion {
            value: value.to_string(),
            data_type: tag.data_type.to_string(),
        })?;
    Ok(ValueUpdate { value: Some(converted), ..update.clone() })
}
