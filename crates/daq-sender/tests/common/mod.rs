//! Sender wired to recording collaborators.

#![allow(dead_code)]

use daq_core::prelude::*;
use daq_sender::prelude::*;
use daq_test_helpers::prelude::*;
use std::sync::Arc;

pub struct Harness {
    pub sender: EquipmentMessageSender,
    pub transport: Arc<RecordingTransport>,
    pub audit: Arc<RecordingAudit>,
    pub tracker: Arc<RecordingTracker>,
}

pub fn harness(equipment: EquipmentConfig) -> Result<Harness, SenderError> {
    harness_with(equipment, SenderConfig::default())
}

pub fn harness_with(equipment: EquipmentConfig, config: SenderConfig) -> Result<Harness, SenderError> {
    init_test_tracing();
    let transport = Arc::new(RecordingTransport::new());
    let audit = Arc::new(RecordingAudit::new());
    let tracker = Arc::new(RecordingTracker::new());
    let sender = EquipmentMessageSender::builder(equipment)
        .config(config)
        .transport(transport.clone())
        .audit(audit.clone())
        .tracker(tracker.clone())
        .build()?;
    Ok(Harness { sender, transport, audit, tracker })
}

/// A timestamp a minute in the past, so tests never trip the future check.
pub fn base_time() -> i64 {
    now_millis() - 60_000
}
