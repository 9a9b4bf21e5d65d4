//! Per-tag state and the table holding it.
//!
//! Every tag lives in its own [`TagCell`]. Holding a cell's lock serializes
//! everything that reads or changes that tag (dispatch, timer flush,
//! reconfiguration) while other tags proceed in parallel.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use daq_core::{CurrentValue, OutgoingMessage, SourceQuality, TagConfig, TagId, ValueUpdate};

use crate::error::{SenderError, SenderResult};
use crate::time_deadband::DeadbandSchedule;

pub(crate) type TagCell = Mutex<TagState>;

/// Everything the sender knows about one tag.
#[derive(Debug)]
pub(crate) struct TagState {
    pub(crate) config: TagConfig,
    pub(crate) current: Option<CurrentValue>,
    pub(crate) schedule: Option<DeadbandSchedule>,
    /// Set once the tag is unlinked from its table; the cell must not be used again.
    pub(crate) removed: bool,
}

impl TagState {
    pub(crate) fn new(config: TagConfig) -> Self {
        Self { config, current: None, schedule: None, removed: false }
    }

    /// Makes `update` the current value.
    pub(crate) fn set_current(&mut self, update: ValueUpdate, quality: SourceQuality, daq_timestamp: i64) {
        self.current = Some(CurrentValue {
            value: update.value,
            value_description: update.value_description,
            quality,
            source_timestamp: update.source_timestamp,
            daq_timestamp,
        });
    }

    /// Makes `update` the current value and builds the message announcing it.
    pub(crate) fn apply(&mut self, update: ValueUpdate, quality: SourceQuality, daq_timestamp: i64) -> OutgoingMessage {
        let current = CurrentValue {
            value: update.value,
            value_description: update.value_description,
            quality,
            source_timestamp: update.source_timestamp,
            daq_timestamp,
        };
        let message = OutgoingMessage::from_current(&self.config, &current);
        self.current = Some(current);
        message
    }

    /// Update carrying the current value and description at a new timestamp.
    pub(crate) fn quality_update(&self, source_timestamp: i64) -> ValueUpdate {
        match &self.current {
            Some(current) => ValueUpdate {
                value: current.value.clone(),
                value_description: current.value_description.clone(),
                source_timestamp,
            },
            None => ValueUpdate::without_value(source_timestamp),
        }
    }
}

#[derive(Default)]
struct Index {
    by_id: HashMap<TagId, Arc<TagCell>>,
    by_name: HashMap<String, TagId>,
}

/// Tag cells by id, plus a name index.
#[derive(Default)]
pub(crate) struct TagTable {
    index: RwLock<Index>,
}

impl TagTable {
    pub(crate) fn get(&self, tag_id: TagId) -> Option<Arc<TagCell>> {
        self.index.read().by_id.get(&tag_id).cloned()
    }

    pub(crate) fn id_for_name(&self, name: &str) -> Option<TagId> {
        self.index.read().by_name.get(name).copied()
    }

    pub(crate) fn insert(&self, config: TagConfig) -> SenderResult<Arc<TagCell>> {
        let mut index = self.index.write();
        if index.by_id.contains_key(&config.id) {
            return Err(SenderError::TagAlreadyExists(config.id));
        }
        if index.by_name.contains_key(&config.name) {
            return Err(daq_core::ConfigError::DuplicateTagName(config.name).into());
        }
        let tag_id = config.id;
        index.by_name.insert(config.name.clone(), tag_id);
        let cell = Arc::new(Mutex::new(TagState::new(config)));
        index.by_id.insert(tag_id, Arc::clone(&cell));
        Ok(cell)
    }

    pub(crate) fn remove(&self, tag_id: TagId) -> Option<Arc<TagCell>> {
        let mut index = self.index.write();
        let cell = index.by_id.remove(&tag_id)?;
        index.by_name.retain(|_, id| *id != tag_id);
        Some(cell)
    }

    /// Points `new_name` at `tag_id`, dropping its previous name.
    pub(crate) fn rename(&self, tag_id: TagId, new_name: &str) -> SenderResult<()> {
        let mut index = self.index.write();
        if index.by_name.get(new_name).is_some_and(|id| *id != tag_id) {
            return Err(daq_core::ConfigError::DuplicateTagName(new_name.to_string()).into());
        }
        index.by_name.retain(|_, id| *id != tag_id);
        index.by_name.insert(new_name.to_string(), tag_id);
        Ok(())
    }

    /// Snapshot of all cells; the table lock is released on return.
    pub(crate) fn cells(&self) -> Vec<Arc<TagCell>> {
        self.index.read().by_id.values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.index.read().by_id.len()
    }
}
