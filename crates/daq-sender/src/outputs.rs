//! Collaborators every dispatcher writes to.

use std::sync::Arc;
use tracing::{debug, error, warn};

use daq_core::{
    CurrentValue, DynamicDeadbandTracker, FilterMessageSender, FilterType, FilteredValue, OutgoingMessage,
    ProcessMessageSender, SourceQuality, TagConfig, ValueUpdate,
};

use crate::stats::SenderStats;

/// Transport, audit channel, usage tracker and counters, shared by the
/// dispatchers and the time deadband timer tasks.
pub(crate) struct Outputs {
    transport: Arc<dyn ProcessMessageSender>,
    audit: Arc<dyn FilterMessageSender>,
    tracker: Arc<dyn DynamicDeadbandTracker>,
    dynamic_time_deadband: bool,
    pub(crate) stats: SenderStats,
}

impl Outputs {
    pub(crate) fn new(
        transport: Arc<dyn ProcessMessageSender>,
        audit: Arc<dyn FilterMessageSender>,
        tracker: Arc<dyn DynamicDeadbandTracker>,
        dynamic_time_deadband: bool,
    ) -> Self {
        Self {
            transport,
            audit,
            tracker,
            dynamic_time_deadband,
            stats: SenderStats::default(),
        }
    }

    pub(crate) fn transport(&self) -> &dyn ProcessMessageSender {
        self.transport.as_ref()
    }

    /// Hands a message to the transport. A refused message is lost.
    pub(crate) fn transmit(&self, message: OutgoingMessage) -> bool {
        let tag_id = message.id;
        let valid = message.is_valid();
        match self.transport.send(message) {
            Ok(()) => {
                self.stats.inc_sent(valid);
                true
            }
            Err(err) => {
                self.stats.inc_transport_failure();
                error!(tag_id, error = %err, "Transport refused tag value; value is lost");
                false
            }
        }
    }

    pub(crate) fn audit_update(
        &self,
        tag: &TagConfig,
        update: &ValueUpdate,
        quality: &SourceQuality,
        filter_type: FilterType,
    ) {
        self.stats.inc_filtered();
        let record = FilteredValue {
            tag_id: tag.id,
            tag_name: tag.name.clone(),
            value: update.value.clone(),
            value_description: update.value_description.clone(),
            quality: quality.clone(),
            source_timestamp: update.source_timestamp,
            filter_type,
            dynamic_filtered: self.is_dynamically_filtered(tag),
        };
        debug!(tag_id = tag.id, filter = %filter_type, "Update filtered");
        if let Err(err) = self.audit.record(record) {
            warn!(tag_id = tag.id, error = %err, "Filtered value could not be audited");
        }
    }

    pub(crate) fn audit_current(&self, tag: &TagConfig, current: &CurrentValue, filter_type: FilterType) {
        self.audit_update(tag, &current.to_update(), &current.quality, filter_type);
    }

    /// True if the usage tracker may put a dynamic deadband on `tag`.
    pub(crate) fn is_dynamic_deadband_eligible(&self, tag: &TagConfig) -> bool {
        self.dynamic_time_deadband && !tag.address.static_time_deadband
    }

    fn is_dynamically_filtered(&self, tag: &TagConfig) -> bool {
        self.is_dynamic_deadband_eligible(tag) && self.tracker.is_dynamic_deadband_active(tag.id)
    }

    /// Reports a send to the usage tracker. High priority tags are never tracked.
    pub(crate) fn record_tag_sent(&self, tag: &TagConfig) {
        if self.is_dynamic_deadband_eligible(tag) && tag.address.priority.allows_dynamic_deadband() {
            self.tracker.record_tag_sent(tag.id);
        }
    }

    pub(crate) fn track_tag(&self, tag: &TagConfig) {
        if self.is_dynamic_deadband_eligible(tag) {
            self.tracker.add_tag(tag);
        }
    }

    pub(crate) fn untrack_tag(&self, tag: &TagConfig) {
        if self.is_dynamic_deadband_eligible(tag) {
            self.tracker.remove_tag(tag.id);
        }
    }
}
