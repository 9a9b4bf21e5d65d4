//! Equipment and sub-equipment configuration.
//!
//! An equipment owns its tags, an optional alive (heartbeat) tag, an optional
//! comm fault tag and any number of sub-equipments, each of which may carry
//! its own alive and comm fault tags.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::tag::{TagConfig, TagId};

/// Configuration of a sub-equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEquipmentConfig {
    /// Sub-equipment id.
    pub id: u64,
    /// Sub-equipment name.
    pub name: String,
    /// Alive tag of the sub-equipment.
    #[serde(default)]
    pub alive_tag_id: Option<TagId>,
    /// Expected alive interval in milliseconds.
    #[serde(default)]
    pub alive_interval_ms: u64,
    /// Comm fault tag of the sub-equipment.
    #[serde(default)]
    pub comm_fault_tag_id: Option<TagId>,
    /// Value of the comm fault tag that signals a fault.
    #[serde(default)]
    pub comm_fault_value: bool,
}

impl SubEquipmentConfig {
    /// Creates a sub-equipment without control tags.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alive_tag_id: None,
            alive_interval_ms: 0,
            comm_fault_tag_id: None,
            comm_fault_value: false,
        }
    }

    /// Sets the comm fault tag.
    #[must_use]
    pub fn with_comm_fault_tag(mut self, tag_id: TagId, fault_value: bool) -> Self {
        self.comm_fault_tag_id = Some(tag_id);
        self.comm_fault_value = fault_value;
        self
    }

    /// Sets the alive tag.
    #[must_use]
    pub fn with_alive_tag(mut self, tag_id: TagId, interval_ms: u64) -> Self {
        self.alive_tag_id = Some(tag_id);
        self.alive_interval_ms = interval_ms;
        self
    }
}

/// Configuration of an equipment and everything it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentConfig {
    /// Equipment id.
    pub id: u64,
    /// Equipment name.
    pub name: String,
    /// Equipment alive tag.
    #[serde(default)]
    pub alive_tag_id: Option<TagId>,
    /// Expected alive interval in milliseconds.
    #[serde(default)]
    pub alive_interval_ms: u64,
    /// Equipment comm fault tag.
    #[serde(default)]
    pub comm_fault_tag_id: Option<TagId>,
    /// Value of the comm fault tag that signals a fault.
    #[serde(default)]
    pub comm_fault_value: bool,
    /// Allow usage driven time deadband for non-static tags.
    #[serde(default)]
    pub dynamic_time_deadband_enabled: bool,
    /// Sub-equipments.
    #[serde(default)]
    pub sub_equipments: Vec<SubEquipmentConfig>,
    /// Data and control tags.
    #[serde(default)]
    pub tags: Vec<TagConfig>,
}

impl EquipmentConfig {
    /// Creates an empty equipment.
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            alive_tag_id: None,
            alive_interval_ms: 0,
            comm_fault_tag_id: None,
            comm_fault_value: false,
            dynamic_time_deadband_enabled: false,
            sub_equipments: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Sets the alive tag.
    #[must_use]
    pub fn with_alive_tag(mut self, tag_id: TagId, interval_ms: u64) -> Self {
        self.alive_tag_id = Some(tag_id);
        self.alive_interval_ms = interval_ms;
        self
    }

    /// Sets the comm fault tag.
    #[must_use]
    pub fn with_comm_fault_tag(mut self, tag_id: TagId, fault_value: bool) -> Self {
        self.comm_fault_tag_id = Some(tag_id);
        self.comm_fault_value = fault_value;
        self
    }

    /// Enables or disables dynamic time deadband.
    #[must_use]
    pub fn with_dynamic_time_deadband(mut self, enabled: bool) -> Self {
        self.dynamic_time_deadband_enabled = enabled;
        self
    }

    /// Adds a sub-equipment.
    #[must_use]
    pub fn with_sub_equipment(mut self, sub: SubEquipmentConfig) -> Self {
        self.sub_equipments.push(sub);
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: TagConfig) -> Self {
        self.tags.push(tag);
        self
    }

    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any error
    /// reported by [`EquipmentConfig::validate`].
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration for consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if tag ids or names repeat, a range is inverted, or
    /// an alive tag has no positive interval.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for tag in &self.tags {
            if !ids.insert(tag.id) {
                return Err(ConfigError::DuplicateTagId(tag.id));
            }
            if !names.insert(tag.name.as_str()) {
                return Err(ConfigError::DuplicateTagName(tag.name.clone()));
            }
            if let (Some(min), Some(max)) = (tag.min_value, tag.max_value) {
                if min > max {
                    return Err(ConfigError::InvalidRange { tag_id: tag.id, min, max });
                }
            }
        }

        if self.alive_tag_id.is_some() && self.alive_interval_ms == 0 {
            return Err(ConfigError::invalid(format!(
                "equipment {} has an alive tag but no alive interval",
                self.name
            )));
        }
        for sub in &self.sub_equipments {
            if sub.alive_tag_id.is_some() && sub.alive_interval_ms == 0 {
                return Err(ConfigError::invalid(format!(
                    "sub-equipment {} has an alive tag but no alive interval",
                    sub.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::DataType;

    fn equipment() -> EquipmentConfig {
        EquipmentConfig::new(1, "EQ")
            .with_alive_tag(100, 30_000)
            .with_comm_fault_tag(101, false)
            .with_sub_equipment(SubEquipmentConfig::new(2, "SUBEQ.1").with_alive_tag(200, 10_000))
            .with_tag(TagConfig::new(10, "EQ.A", DataType::Integer))
            .with_tag(TagConfig::new(11, "EQ.B", DataType::Double))
    }

    #[test]
    fn test_valid_configuration() {
        assert!(equipment().validate().is_ok());
    }

    #[test]
    fn test_duplicate_tag_id_rejected() {
        let config = equipment().with_tag(TagConfig::new(10, "EQ.C", DataType::Integer));
        assert_eq!(config.validate(), Err(ConfigError::DuplicateTagId(10)));
    }

    #[test]
    fn test_duplicate_tag_name_rejected() {
        let config = equipment().with_tag(TagConfig::new(12, "EQ.A", DataType::Integer));
        assert_eq!(config.validate(), Err(ConfigError::DuplicateTagName("EQ.A".into())));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let config = equipment()
            .with_tag(TagConfig::new(12, "EQ.C", DataType::Integer).with_range(Some(5.0), Some(1.0)));
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange { tag_id: 12, .. })));
    }

    #[test]
    fn test_alive_without_interval_rejected() {
        let config = EquipmentConfig::new(1, "EQ").with_alive_tag(100, 0);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidConfiguration(_))));
    }
}
