//! Communication fault reporting for an equipment and its sub-equipments.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info};

use daq_core::{CommFaultState, EquipmentConfig, TagId};

use crate::outputs::Outputs;

#[derive(Debug, Clone)]
struct CommFaultEntity {
    tag_id: TagId,
    name: String,
    fault_value: bool,
}

/// Sends comm fault states, dropping a state identical to the last one sent
/// for the same comm fault tag.
pub(crate) struct CommFaultSender {
    entities: Vec<CommFaultEntity>,
    last_sent: Mutex<HashMap<TagId, CommFaultState>>,
    outputs: Arc<Outputs>,
}

impl CommFaultSender {
    pub(crate) fn new(equipment: &EquipmentConfig, outputs: Arc<Outputs>) -> Self {
        let main = equipment.comm_fault_tag_id.map(|tag_id| CommFaultEntity {
            tag_id,
            name: equipment.name.clone(),
            fault_value: equipment.comm_fault_value,
        });
        let subs = equipment.sub_equipments.iter().filter_map(|sub| {
            sub.comm_fault_tag_id.map(|tag_id| CommFaultEntity {
                tag_id,
                name: sub.name.clone(),
                fault_value: sub.comm_fault_value,
            })
        });
        Self {
            entities: main.into_iter().chain(subs).collect(),
            last_sent: Mutex::new(HashMap::new()),
            outputs,
        }
    }

    /// Reports the equipment and every sub-equipment as faulty or healthy.
    ///
    /// Returns the number of states handed to the transport.
    pub(crate) fn confirm(&self, faulty: bool, description: Option<&str>) -> usize {
        if self.entities.is_empty() {
            debug!("No comm fault tag configured; nothing to confirm");
            return 0;
        }
        if faulty {
            info!(description, "Confirming equipment state INCORRECT");
        } else {
            info!(description, "Confirming equipment state OK");
        }

        let mut sent = 0usize;
        for entity in &self.entities {
            let value = if faulty { entity.fault_value } else { !entity.fault_value };
            let state = CommFaultState::new(entity.tag_id, &entity.name, value, description.map(str::to_string));
            if self.send(state) {
                sent = sent.saturating_add(1);
            }
        }
        sent
    }

    fn send(&self, state: CommFaultState) -> bool {
        let mut last_sent = self.last_sent.lock();
        if last_sent.get(&state.tag_id) == Some(&state) {
            self.outputs.stats.inc_comm_fault_repeated();
            debug!(tag_id = state.tag_id, value = state.value, "Comm fault state unchanged; not sent");
            return false;
        }
        match self.outputs.transport().send_equipment_state(&state) {
            Ok(()) => {
                self.outputs.stats.inc_comm_fault_sent();
                last_sent.insert(state.tag_id, state);
                true
            }
            Err(err) => {
                self.outputs.stats.inc_transport_failure();
                error!(tag_id = state.tag_id, error = %err, "Comm fault state could not be sent");
                false
            }
        }
    }
}
