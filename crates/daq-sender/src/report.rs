//! Outcome of a configuration change.

use serde::Serialize;
use std::fmt;

use daq_core::TagId;

/// What the sender did in response to a tag being added, removed or updated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ChangeReport {
    /// Tag the change applied to.
    pub tag_id: TagId,
    /// Actions taken, in order.
    pub actions: Vec<String>,
}

impl ChangeReport {
    pub(crate) fn new(tag_id: TagId) -> Self {
        Self { tag_id, actions: Vec::new() }
    }

    pub(crate) fn push(&mut self, action: impl Into<String>) {
        self.actions.push(action.into());
    }

    /// True if no action was needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// True if an action mentions `text`.
    #[must_use]
    pub fn mentions(&self, text: &str) -> bool {
        self.actions.iter().any(|action| action.contains(text))
    }
}

impl fmt::Display for ChangeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actions.is_empty() {
            return write!(f, "tag {}: no change", self.tag_id);
        }
        write!(f, "tag {}: {}", self.tag_id, self.actions.join("; "))
    }
}
