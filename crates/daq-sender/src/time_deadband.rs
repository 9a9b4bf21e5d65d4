//! Time deadband: rate-limits tags to one send per interval.
//!
//! A tag with a time deadband never sends directly. Each accepted update
//! overwrites the tag's current value and marks it pending; a periodic task
//! on the shared timer thread ("tick") sends the pending value at most once
//! per interval. Values overwritten before a tick are reported to the audit
//! channel instead of being lost silently.
//!
//! The schedule of a tag lives inside its [`TagState`] and is only touched
//! under the tag lock. Timer tasks capture a weak reference to the tag cell
//! and the generation of the schedule that created them, so a task that
//! outlives its schedule (cancelled concurrently, or replaced after a quality
//! change) finds a different generation and does nothing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

use daq_core::{CurrentValue, FilterType, OutgoingMessage, SourceQuality, ValueUpdate};
use daq_filters::classify;
use daq_scheduler::{TaskHandle, TimerService};

use crate::error::DispatchError;
use crate::outputs::Outputs;
use crate::tag_table::{TagCell, TagState, TagTable};

/// Periodic flush of one tag.
#[derive(Debug)]
pub(crate) struct DeadbandSchedule {
    interval_ms: u32,
    generation: u64,
    pending: bool,
    last_sent: Option<CurrentValue>,
    handle: TaskHandle,
}

impl DeadbandSchedule {
    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }
}

impl Drop for DeadbandSchedule {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}

/// Owner of the timer thread shared by all time deadband schedules.
pub(crate) struct TimeDeadband {
    timer: TimerService,
    outputs: Arc<Outputs>,
    next_generation: AtomicU64,
}

impl TimeDeadband {
    pub(crate) fn new(timer: TimerService, outputs: Arc<Outputs>) -> Self {
        Self { timer, outputs, next_generation: AtomicU64::new(0) }
    }

    /// Buffers `update` as the tag's pending value.
    ///
    /// Creates the tag's schedule on first use; the first tick fires right
    /// away. A change of quality code, or of the configured interval, flushes
    /// and replaces the schedule so the transition is sent promptly.
    pub(crate) fn add(
        &self,
        cell: &Arc<TagCell>,
        state: &mut TagState,
        update: ValueUpdate,
        quality: SourceQuality,
        now: i64,
    ) -> Result<(), DispatchError> {
        let interval_ms = state.config.address.time_deadband_ms;
        let reset = match (&state.schedule, &state.current) {
            (Some(schedule), _) if schedule.interval_ms != interval_ms => true,
            (Some(_), Some(current)) => current.quality.code() != quality.code(),
            _ => false,
        };
        if reset {
            debug!(tag_id = state.config.id, quality = %quality, "Quality or interval changed; restarting time deadband");
            self.remove(state);
        }
        if state.schedule.is_none() {
            state.schedule = Some(self.schedule(cell, interval_ms)?);
        }

        self.outputs.record_tag_sent(&state.config);

        let overwrites_pending = state.schedule.as_ref().is_some_and(DeadbandSchedule::is_pending);
        if overwrites_pending {
            if let Some(current) = &state.current {
                self.outputs.audit_current(&state.config, current, FilterType::TimeDeadband);
            }
        }

        state.set_current(update, quality, now);
        if let Some(schedule) = state.schedule.as_mut() {
            schedule.pending = true;
        }
        self.outputs.stats.inc_buffered();
        trace!(tag_id = state.config.id, "Value buffered in time deadband");
        Ok(())
    }

    /// Flushes a pending value, then cancels and drops the tag's schedule.
    ///
    /// Returns true if a pending value was flushed.
    pub(crate) fn remove(&self, state: &mut TagState) -> bool {
        let Some(schedule) = &state.schedule else {
            return false;
        };
        schedule.handle.cancel();
        let flushed = schedule.pending;
        if flushed {
            tick(&self.outputs, state);
        }
        state.schedule = None;
        flushed
    }

    /// Ticks every schedule with a pending value. Schedules stay in place.
    ///
    /// Returns the number of tags flushed.
    pub(crate) fn flush_all(&self, tags: &TagTable) -> usize {
        let mut flushed = 0usize;
        for cell in tags.cells() {
            let mut state = cell.lock();
            if state.schedule.as_ref().is_some_and(DeadbandSchedule::is_pending) {
                tick(&self.outputs, &mut state);
                flushed = flushed.saturating_add(1);
            }
        }
        flushed
    }

    /// Flushes and drops every schedule, then stops the timer thread.
    pub(crate) fn shutdown(&self, tags: &TagTable) {
        for cell in tags.cells() {
            self.remove(&mut cell.lock());
        }
        self.timer.shutdown();
    }

    fn schedule(&self, cell: &Arc<TagCell>, interval_ms: u32) -> Result<DeadbandSchedule, DispatchError> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let weak_cell = Arc::downgrade(cell);
        let outputs = Arc::clone(&self.outputs);
        let handle = self.timer.schedule_at_fixed_rate(
            Duration::ZERO,
            Duration::from_millis(u64::from(interval_ms)),
            move || {
                let Some(cell) = weak_cell.upgrade() else {
                    return;
                };
                let mut state = cell.lock();
                if state.schedule.as_ref().is_some_and(|s| s.generation == generation) {
                    tick(&outputs, &mut state);
                }
            },
        )?;
        Ok(DeadbandSchedule { interval_ms, generation, pending: false, last_sent: None, handle })
    }
}

/// Sends the pending value unless it repeats the last one sent.
fn tick(outputs: &Outputs, state: &mut TagState) {
    let TagState { config, current, schedule, .. } = state;
    let Some(schedule) = schedule.as_mut() else {
        return;
    };
    if !schedule.pending {
        return;
    }
    schedule.pending = false;
    let Some(pending) = current.as_ref() else {
        warn!(tag_id = config.id, "Time deadband tick without a current value");
        return;
    };

    match classify(config, schedule.last_sent.as_ref(), &pending.to_update(), &pending.quality) {
        FilterType::NoFiltering => {
            outputs.transmit(OutgoingMessage::from_current(config, pending));
            schedule.last_sent = Some(pending.clone());
        }
        filter => {
            trace!(tag_id = config.id, filter = %filter, "Pending value repeats last sent value");
            outputs.audit_current(config, pending, FilterType::TimeDeadband);
        }
    }
}
