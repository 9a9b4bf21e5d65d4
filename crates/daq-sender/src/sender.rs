//! The equipment message sender facade.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

use daq_core::{
    CurrentValue, DiscardAudit, DynamicDeadbandTracker, EquipmentConfig, FilterMessageSender, NoDynamicDeadband,
    ProcessMessageSender, SourceQuality, TagConfig, TagId, ValueUpdate, now_millis,
};
use daq_filters::UpdateValidator;
use daq_scheduler::TimerService;

use crate::alive::{AliveSender, Heartbeat};
use crate::comm_fault::CommFaultSender;
use crate::config::SenderConfig;
use crate::error::{SenderError, SenderResult};
use crate::invalid::InvalidSender;
use crate::outputs::Outputs;
use crate::report::ChangeReport;
use crate::stats::SenderStatsSnapshot;
use crate::tag_table::{TagCell, TagState, TagTable};
use crate::time_deadband::TimeDeadband;
use crate::valid::ValidSender;

#[derive(Debug, Clone)]
struct AliveTag {
    interval_ms: u64,
    owner: String,
}

/// Entry point of the pipeline for one equipment.
///
/// Every method may be called from any thread. Updates for the same tag are
/// serialized; updates for different tags run in parallel. Problems with an
/// update itself never surface as errors: a bad value becomes an
/// invalidation, a refused send is logged as data loss.
pub struct EquipmentMessageSender {
    equipment_name: String,
    supervision_alive: Option<TagId>,
    alive_tags: HashMap<TagId, AliveTag>,
    tags: TagTable,
    outputs: Arc<Outputs>,
    deadband: Arc<TimeDeadband>,
    valid: ValidSender,
    invalid: Arc<InvalidSender>,
    alive: AliveSender,
    comm_fault: CommFaultSender,
    shut_down: AtomicBool,
}

impl fmt::Debug for EquipmentMessageSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquipmentMessageSender")
            .field("equipment", &self.equipment_name)
            .field("tags", &self.tags.len())
            .field("shut_down", &self.shut_down.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EquipmentMessageSender {
    /// Create a builder for `equipment`.
    #[must_use]
    pub fn builder(equipment: EquipmentConfig) -> EquipmentMessageSenderBuilder {
        EquipmentMessageSenderBuilder::new(equipment)
    }

    /// Name of the equipment.
    #[must_use]
    pub fn equipment_name(&self) -> &str {
        &self.equipment_name
    }

    /// Number of configured tags.
    #[must_use]
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Dispatches a valid update from the driver.
    ///
    /// Alive tags of the equipment and its sub-equipments are routed to the
    /// alive heartbeat instead. Returns true if a message was handed to the
    /// transport right away; false if the update was filtered, buffered in
    /// the time deadband, turned into an invalidation that was filtered, or
    /// refused by the transport.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag and
    /// [`SenderError::ShutDown`] after [`EquipmentMessageSender::shutdown`].
    pub fn update(&self, tag_id: TagId, update: ValueUpdate) -> SenderResult<bool> {
        self.dispatch(tag_id, update, SourceQuality::ok())
    }

    /// [`EquipmentMessageSender::update`] by tag name.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::UnknownTagName`] for an unknown name.
    pub fn update_by_name(&self, tag_name: &str, update: ValueUpdate) -> SenderResult<bool> {
        let tag_id = self.tag_id(tag_name)?;
        self.update(tag_id, update)
    }

    /// Dispatches an update arriving with its own quality.
    ///
    /// # Errors
    ///
    /// Same as [`EquipmentMessageSender::update`].
    pub fn update_with_quality(&self, tag_id: TagId, update: ValueUpdate, quality: SourceQuality) -> SenderResult<bool> {
        self.dispatch(tag_id, update, quality)
    }

    /// Changes the quality of a tag now, keeping its current value.
    ///
    /// # Errors
    ///
    /// Same as [`EquipmentMessageSender::update`].
    pub fn update_quality(&self, tag_id: TagId, quality: SourceQuality) -> SenderResult<bool> {
        self.update_quality_at(tag_id, quality, now_millis())
    }

    /// Changes the quality of a tag at `source_timestamp`, keeping its current value.
    ///
    /// # Errors
    ///
    /// Same as [`EquipmentMessageSender::update`].
    pub fn update_quality_at(&self, tag_id: TagId, quality: SourceQuality, source_timestamp: i64) -> SenderResult<bool> {
        self.ensure_running()?;
        let cell = self.cell(tag_id)?;
        let mut state = cell.lock();
        ensure_present(&state)?;
        let update = state.quality_update(source_timestamp);
        let now = now_millis();
        if quality.is_valid() {
            Ok(self.valid.update(&cell, &mut state, &update, now))
        } else {
            Ok(self.invalid.invalidate(&cell, &mut state, update, quality, now))
        }
    }

    /// [`EquipmentMessageSender::update_quality`] by tag name.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::UnknownTagName`] for an unknown name.
    pub fn update_quality_by_name(&self, tag_name: &str, quality: SourceQuality) -> SenderResult<bool> {
        let tag_id = self.tag_id(tag_name)?;
        self.update_quality(tag_id, quality)
    }

    /// [`EquipmentMessageSender::update_quality_at`] by tag name.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::UnknownTagName`] for an unknown name.
    pub fn update_quality_by_name_at(
        &self,
        tag_name: &str,
        quality: SourceQuality,
        source_timestamp: i64,
    ) -> SenderResult<bool> {
        let tag_id = self.tag_id(tag_name)?;
        self.update_quality_at(tag_id, quality, source_timestamp)
    }

    /// Sends the equipment alive heartbeat stamped now.
    ///
    /// Returns false if the equipment has no alive tag, alive filtering
    /// suppressed the heartbeat, or the transport refused it.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::ShutDown`] after shutdown.
    pub fn send_supervision_alive(&self) -> SenderResult<bool> {
        self.send_supervision_alive_at(now_millis())
    }

    /// Sends the equipment alive heartbeat stamped `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::ShutDown`] after shutdown.
    pub fn send_supervision_alive_at(&self, timestamp: i64) -> SenderResult<bool> {
        self.ensure_running()?;
        let Some(tag_id) = self.supervision_alive else {
            debug!(equipment = %self.equipment_name, "No alive tag configured");
            return Ok(false);
        };
        Ok(self.send_alive(tag_id, None, timestamp, now_millis()))
    }

    /// Reports the equipment and its sub-equipments as communicating.
    ///
    /// Returns the number of comm fault states sent; unchanged states are not
    /// sent again.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::ShutDown`] after shutdown.
    pub fn confirm_equipment_state_ok(&self, description: Option<&str>) -> SenderResult<usize> {
        self.ensure_running()?;
        Ok(self.comm_fault.confirm(false, description))
    }

    /// Reports the equipment and its sub-equipments as faulty.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::ShutDown`] after shutdown.
    pub fn confirm_equipment_state_incorrect(&self, description: Option<&str>) -> SenderResult<usize> {
        self.ensure_running()?;
        Ok(self.comm_fault.confirm(true, description))
    }

    /// Sends every value pending in a time deadband now.
    ///
    /// Returns the number of tags flushed.
    pub fn send_delayed_time_deadband_values(&self) -> usize {
        let flushed = self.deadband.flush_all(&self.tags);
        debug!(equipment = %self.equipment_name, flushed, "Time deadband values flushed");
        flushed
    }

    /// Registers a new tag.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagAlreadyExists`] if the id is taken, or a
    /// configuration error if the name is taken or the range is inverted.
    pub fn on_tag_added(&self, tag: TagConfig) -> SenderResult<ChangeReport> {
        check_range(&tag)?;
        let mut report = ChangeReport::new(tag.id);
        let eligible = self.outputs.is_dynamic_deadband_eligible(&tag);
        self.tags.insert(tag.clone())?;
        report.push("tag added");
        if eligible {
            self.outputs.track_tag(&tag);
            report.push("registered with dynamic deadband tracker");
        }
        info!(tag_id = tag.id, tag = %tag.name, "Tag added");
        Ok(report)
    }

    /// Unregisters a tag, flushing a value pending in its time deadband.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag.
    pub fn on_tag_removed(&self, tag_id: TagId) -> SenderResult<ChangeReport> {
        let cell = self.tags.remove(tag_id).ok_or(SenderError::TagNotFound(tag_id))?;
        let mut state = cell.lock();
        state.removed = true;
        let mut report = ChangeReport::new(tag_id);
        report.push("tag removed");
        if state.schedule.is_some() {
            if self.deadband.remove(&mut state) {
                report.push("pending time deadband value flushed");
            }
            report.push("time deadband scheduler removed");
        }
        if self.outputs.is_dynamic_deadband_eligible(&state.config) {
            self.outputs.untrack_tag(&state.config);
            report.push("unregistered from dynamic deadband tracker");
        }
        info!(tag_id, "Tag removed");
        Ok(report)
    }

    /// Replaces a tag's configuration, keeping its current value.
    ///
    /// A changed time deadband setting removes the tag's scheduler (flushing
    /// a pending value); the next update creates one with the new setting.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag, or a
    /// configuration error if the new name is taken or the range is inverted.
    pub fn on_tag_updated(&self, tag: TagConfig) -> SenderResult<ChangeReport> {
        check_range(&tag)?;
        let cell = self.cell(tag.id)?;
        let mut state = cell.lock();
        ensure_present(&state)?;
        let mut report = ChangeReport::new(tag.id);

        if state.config.name != tag.name {
            self.tags.rename(tag.id, &tag.name)?;
            report.push(format!("renamed to {}", tag.name));
        }

        let old = &state.config.address;
        let deadband_changed = old.static_time_deadband != tag.address.static_time_deadband
            || old.time_deadband_ms != tag.address.time_deadband_ms;
        if deadband_changed && state.schedule.is_some() {
            if self.deadband.remove(&mut state) {
                report.push("pending time deadband value flushed");
            }
            report.push("time deadband scheduler removed");
        }

        let was_eligible = self.outputs.is_dynamic_deadband_eligible(&state.config);
        let is_eligible = self.outputs.is_dynamic_deadband_eligible(&tag);
        let priority_changed = state.config.address.priority != tag.address.priority;
        if was_eligible != is_eligible || (is_eligible && priority_changed) {
            if was_eligible {
                self.outputs.untrack_tag(&state.config);
                report.push("unregistered from dynamic deadband tracker");
            }
            if is_eligible {
                self.outputs.track_tag(&tag);
                report.push("registered with dynamic deadband tracker");
            }
        }

        state.config = tag;
        info!(tag_id = state.config.id, %report, "Tag updated");
        Ok(report)
    }

    /// Switches a tag's time deadband on (`Some(interval_ms)`) or off (`None`).
    ///
    /// Switching off flushes a pending value and removes the scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag.
    pub fn set_time_deadband(&self, tag_id: TagId, interval_ms: Option<u32>) -> SenderResult<()> {
        let cell = self.cell(tag_id)?;
        let mut state = cell.lock();
        ensure_present(&state)?;
        state.config.address.time_deadband_ms = interval_ms.unwrap_or(0);
        if interval_ms.is_none_or(|ms| ms == 0) && state.schedule.is_some() {
            self.deadband.remove(&mut state);
        }
        debug!(tag_id, interval_ms, "Time deadband changed");
        Ok(())
    }

    /// Current value of a tag, if it has received one.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag.
    pub fn current_value(&self, tag_id: TagId) -> SenderResult<Option<CurrentValue>> {
        Ok(self.cell(tag_id)?.lock().current.clone())
    }

    /// Current configuration of a tag.
    ///
    /// # Errors
    ///
    /// Returns [`SenderError::TagNotFound`] for an unknown tag.
    pub fn tag_config(&self, tag_id: TagId) -> SenderResult<TagConfig> {
        Ok(self.cell(tag_id)?.lock().config.clone())
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> SenderStatsSnapshot {
        self.outputs.stats.snapshot()
    }

    /// True until [`EquipmentMessageSender::shutdown`] is called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.shut_down.load(Ordering::Acquire)
    }

    /// Flushes every pending time deadband value and stops the timer thread.
    ///
    /// Later updates are rejected with [`SenderError::ShutDown`]. Calling it
    /// again is a no-op; dropping the sender calls it.
    pub fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        self.deadband.shutdown(&self.tags);
        info!(equipment = %self.equipment_name, stats = ?self.stats(), "Equipment message sender stopped");
    }

    fn dispatch(&self, tag_id: TagId, update: ValueUpdate, quality: SourceQuality) -> SenderResult<bool> {
        self.ensure_running()?;
        let now = now_millis();
        if quality.is_valid() && self.alive_tags.contains_key(&tag_id) {
            let timestamp = update.source_timestamp;
            return Ok(self.send_alive(tag_id, Some(&update), timestamp, now));
        }

        let cell = self.cell(tag_id)?;
        self.dispatch_to(&cell, update, quality, now)
    }

    fn dispatch_to(
        &self,
        cell: &Arc<TagCell>,
        update: ValueUpdate,
        quality: SourceQuality,
        now: i64,
    ) -> SenderResult<bool> {
        let mut state = cell.lock();
        ensure_present(&state)?;
        if quality.is_valid() {
            Ok(self.valid.update(cell, &mut state, &update, now))
        } else {
            Ok(self.invalid.invalidate(cell, &mut state, update, quality, now))
        }
    }

    fn send_alive(&self, tag_id: TagId, update: Option<&ValueUpdate>, timestamp: i64, now: i64) -> bool {
        let Some(alive) = self.alive_tags.get(&tag_id) else {
            return false;
        };
        let heartbeat = Heartbeat {
            tag_id,
            interval_ms: alive.interval_ms,
            equipment_name: &alive.owner,
            update,
            timestamp,
        };
        match self.tags.get(tag_id) {
            Some(cell) => self.alive.send(&heartbeat, Some(&mut *cell.lock()), now),
            None => self.alive.send(&heartbeat, None, now),
        }
    }

    fn ensure_running(&self) -> SenderResult<()> {
        if self.is_running() { Ok(()) } else { Err(SenderError::ShutDown) }
    }

    fn cell(&self, tag_id: TagId) -> SenderResult<Arc<TagCell>> {
        self.tags.get(tag_id).ok_or(SenderError::TagNotFound(tag_id))
    }

    fn tag_id(&self, tag_name: &str) -> SenderResult<TagId> {
        self.tags
            .id_for_name(tag_name)
            .ok_or_else(|| SenderError::UnknownTagName(tag_name.to_string()))
    }
}

impl Drop for EquipmentMessageSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Fails for a cell taken from the table before the tag was removed.
fn ensure_present(state: &TagState) -> SenderResult<()> {
    if state.removed { Err(SenderError::TagNotFound(state.config.id)) } else { Ok(()) }
}

fn check_range(tag: &TagConfig) -> SenderResult<()> {
    match (tag.min_value, tag.max_value) {
        (Some(min), Some(max)) if min > max => {
            Err(daq_core::ConfigError::InvalidRange { tag_id: tag.id, min, max }.into())
        }
        _ => Ok(()),
    }
}

/// Builder for [`EquipmentMessageSender`].
pub struct EquipmentMessageSenderBuilder {
    equipment: EquipmentConfig,
    config: SenderConfig,
    transport: Option<Arc<dyn ProcessMessageSender>>,
    audit: Arc<dyn FilterMessageSender>,
    tracker: Arc<dyn DynamicDeadbandTracker>,
}

impl fmt::Debug for EquipmentMessageSenderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EquipmentMessageSenderBuilder")
            .field("equipment", &self.equipment.name)
            .field("config", &self.config)
            .field("has_transport", &self.transport.is_some())
            .finish_non_exhaustive()
    }
}

impl EquipmentMessageSenderBuilder {
    fn new(equipment: EquipmentConfig) -> Self {
        Self {
            equipment,
            config: SenderConfig::default(),
            transport: None,
            audit: Arc::new(DiscardAudit),
            tracker: Arc::new(NoDynamicDeadband),
        }
    }

    /// Set the sender options.
    #[must_use]
    pub fn config(mut self, config: SenderConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the transport. Required.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn ProcessMessageSender>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the audit channel for filtered values. Defaults to discarding them.
    #[must_use]
    pub fn audit(mut self, audit: Arc<dyn FilterMessageSender>) -> Self {
        self.audit = audit;
        self
    }

    /// Set the dynamic deadband usage tracker. Defaults to no dynamic deadband.
    #[must_use]
    pub fn tracker(mut self, tracker: Arc<dyn DynamicDeadbandTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    /// Validate the configuration, start the timer thread and register all tags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no transport was set or the
    /// equipment or sender configuration is invalid, and
    /// [`SenderError::Timer`] if the timer thread cannot be started.
    pub fn build(self) -> SenderResult<EquipmentMessageSender> {
        let Self { equipment, config, transport, audit, tracker } = self;
        let transport = transport.ok_or_else(|| SenderError::invalid_configuration("a transport is required"))?;
        equipment.validate()?;
        config.validate()?;

        let outputs = Arc::new(Outputs::new(transport, audit, tracker, equipment.dynamic_time_deadband_enabled));
        let timer = TimerService::start(config.timer_thread_name.clone())?;
        let deadband = Arc::new(TimeDeadband::new(timer, Arc::clone(&outputs)));
        let invalid = Arc::new(InvalidSender::new(Arc::clone(&outputs), Arc::clone(&deadband)));
        let valid = ValidSender::new(
            UpdateValidator::new(config.max_future_skew()),
            Arc::clone(&outputs),
            Arc::clone(&deadband),
            Arc::clone(&invalid),
        );
        let alive = AliveSender::new(config.alive_filtering, Arc::clone(&outputs));
        let comm_fault = CommFaultSender::new(&equipment, Arc::clone(&outputs));

        let mut alive_tags = HashMap::new();
        if let Some(tag_id) = equipment.alive_tag_id {
            alive_tags.insert(tag_id, AliveTag { interval_ms: equipment.alive_interval_ms, owner: equipment.name.clone() });
        }
        for sub in &equipment.sub_equipments {
            if let Some(tag_id) = sub.alive_tag_id {
                alive_tags.insert(tag_id, AliveTag { interval_ms: sub.alive_interval_ms, owner: sub.name.clone() });
            }
        }

        let tags = TagTable::default();
        for tag in equipment.tags {
            outputs.track_tag(&tag);
            tags.insert(tag)?;
        }

        info!(
            equipment = %equipment.name,
            tags = tags.len(),
            alive_tags = alive_tags.len(),
            timer = %config.timer_thread_name,
            "Equipment message sender started"
        );
        Ok(EquipmentMessageSender {
            equipment_name: equipment.name,
            supervision_alive: equipment.alive_tag_id,
            alive_tags,
            tags,
            outputs,
            deadband,
            valid,
            invalid,
            alive,
            comm_fault,
            shut_down: AtomicBool::new(false),
        })
    }
}
