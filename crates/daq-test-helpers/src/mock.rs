//! Recording implementations of the pipeline's collaborators.
//!
//! Each double stores everything it receives so tests can assert on the
//! exact sequence of messages, audit records and tracker calls.

use daq_core::prelude::*;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

/// Transport that records every message and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    messages: Mutex<Vec<OutgoingMessage>>,
    states: Mutex<Vec<CommFaultState>>,
    failing: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport whose every send fails with [`TransportError::Disconnected`].
    pub fn failing() -> Self {
        let transport = Self::default();
        transport.set_failing(true);
        transport
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.messages.lock().clone()
    }

    /// Messages sent for one tag, in send order.
    pub fn messages_for(&self, tag_id: TagId) -> Vec<OutgoingMessage> {
        self.messages.lock().iter().filter(|m| m.id == tag_id).cloned().collect()
    }

    pub fn last_message(&self) -> Option<OutgoingMessage> {
        self.messages.lock().last().cloned()
    }

    pub fn message_count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn equipment_states(&self) -> Vec<CommFaultState> {
        self.states.lock().clone()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
        self.states.lock().clear();
    }
}

impl ProcessMessageSender for RecordingTransport {
    fn send(&self, message: OutgoingMessage) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        self.messages.lock().push(message);
        Ok(())
    }

    fn send_equipment_state(&self, state: &CommFaultState) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Disconnected);
        }
        self.states.lock().push(state.clone());
        Ok(())
    }
}

/// Audit sink that records every filtered value.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    records: Mutex<Vec<FilteredValue>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<FilteredValue> {
        self.records.lock().clone()
    }

    pub fn records_for(&self, tag_id: TagId) -> Vec<FilteredValue> {
        self.records.lock().iter().filter(|r| r.tag_id == tag_id).cloned().collect()
    }

    /// Filter types recorded so far, in order.
    pub fn filter_types(&self) -> Vec<FilterType> {
        self.records.lock().iter().map(|r| r.filter_type).collect()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl FilterMessageSender for RecordingAudit {
    fn record(&self, value: FilteredValue) -> Result<(), TransportError> {
        self.records.lock().push(value);
        Ok(())
    }
}

/// Tracker call, as seen by [`RecordingTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    RecordSent(TagId),
    Add(TagId),
    Remove(TagId),
}

/// Usage tracker with a settable set of dynamically filtered tags.
#[derive(Debug, Default)]
pub struct RecordingTracker {
    calls: Mutex<Vec<TrackerCall>>,
    active: Mutex<HashSet<TagId>>,
}

impl RecordingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `tag_id` as having an active dynamic deadband.
    pub fn activate(&self, tag_id: TagId) {
        self.active.lock().insert(tag_id);
    }

    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().clone()
    }

    /// Number of `record_tag_sent` calls for one tag.
    pub fn sent_count(&self, tag_id: TagId) -> usize {
        self.calls.lock().iter().filter(|c| **c == TrackerCall::RecordSent(tag_id)).count()
    }

    pub fn is_tracked(&self, tag_id: TagId) -> bool {
        let calls = self.calls.lock();
        let added = calls.iter().filter(|c| **c == TrackerCall::Add(tag_id)).count();
        let removed = calls.iter().filter(|c| **c == TrackerCall::Remove(tag_id)).count();
        added > removed
    }
}

impl DynamicDeadbandTracker for RecordingTracker {
    fn record_tag_sent(&self, tag_id: TagId) {
        self.calls.lock().push(TrackerCall::RecordSent(tag_id));
    }

    fn is_dynamic_deadband_active(&self, tag_id: TagId) -> bool {
        self.active.lock().contains(&tag_id)
    }

    fn add_tag(&self, tag: &TagConfig) {
        self.calls.lock().push(TrackerCall::Add(tag.id));
    }

    fn remove_tag(&self, tag_id: TagId) {
        self.calls.lock().push(TrackerCall::Remove(tag_id));
    }
}
