//! Interfaces of the pipeline's external collaborators.
//!
//! The pipeline decides what to send; these traits deliver it. All of them
//! are called while a tag lock is held, so implementations must hand off
//! quickly (typically by enqueueing) and never call back into the sender.

use thiserror::Error;

use crate::message::{CommFaultState, FilteredValue, OutgoingMessage};
use crate::tag::{TagConfig, TagId};

/// Failure to hand a message to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection to the server is down.
    #[error("transport disconnected")]
    Disconnected,
    /// The send was interrupted.
    #[error("send interrupted")]
    Interrupted,
    /// The outgoing queue is full.
    #[error("outgoing queue full")]
    QueueFull,
    /// Any other delivery failure.
    #[error("{0}")]
    Other(String),
}

/// Delivers tag values and equipment state to the server.
pub trait ProcessMessageSender: Send + Sync {
    /// Hands one tag value to the transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the value could not be enqueued; the
    /// value is then lost.
    fn send(&self, message: OutgoingMessage) -> Result<(), TransportError>;

    /// Hands a comm fault state to the transport.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the state could not be enqueued.
    fn send_equipment_state(&self, state: &CommFaultState) -> Result<(), TransportError>;
}

/// Receives values that were filtered instead of sent.
pub trait FilterMessageSender: Send + Sync {
    /// Records one filtered value.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the record could not be enqueued.
    fn record(&self, value: FilteredValue) -> Result<(), TransportError>;
}

/// Usage tracker deciding which tags get a dynamic time deadband.
pub trait DynamicDeadbandTracker: Send + Sync {
    /// A value of `tag_id` was just handed to the transport.
    fn record_tag_sent(&self, tag_id: TagId);

    /// True while the tracker keeps a dynamic time deadband on `tag_id`.
    fn is_dynamic_deadband_active(&self, tag_id: TagId) -> bool;

    /// Starts tracking a tag.
    fn add_tag(&self, tag: &TagConfig);

    /// Stops tracking a tag.
    fn remove_tag(&self, tag_id: TagId);
}

/// Audit sink that drops every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardAudit;

impl FilterMessageSender for DiscardAudit {
    fn record(&self, _value: FilteredValue) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Tracker for equipment without dynamic time deadband.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDynamicDeadband;

impl DynamicDeadbandTracker for NoDynamicDeadband {
    fn record_tag_sent(&self, _tag_id: TagId) {}

    fn is_dynamic_deadband_active(&self, _tag_id: TagId) -> bool {
        false
    }

    fn add_tag(&self, _tag: &TagConfig) {}

    fn remove_tag(&self, _tag_id: TagId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        assert_eq!(TransportError::Disconnected.to_string(), "transport disconnected");
        assert_eq!(TransportError::Other("jms broker gone".into()).to_string(), "jms broker gone");
    }

    #[test]
    fn test_no_dynamic_deadband_is_inactive() {
        let tracker = NoDynamicDeadband;
        tracker.record_tag_sent(1);
        assert!(!tracker.is_dynamic_deadband_active(1));
    }
}
