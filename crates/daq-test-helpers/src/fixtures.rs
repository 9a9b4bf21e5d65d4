//! Equipment and tag fixtures used across the test suites.

use daq_core::prelude::*;

/// Equipment alive tag id used by [`boiler_equipment`].
pub const ALIVE_TAG: TagId = 1000;
/// Equipment comm fault tag id used by [`boiler_equipment`].
pub const COMM_FAULT_TAG: TagId = 1001;
/// Alive interval of [`boiler_equipment`], in milliseconds.
pub const ALIVE_INTERVAL_MS: u64 = 10_000;

/// Plain double tag with a 0..120 range.
pub const TEMPERATURE: TagId = 1;
/// Double tag with a 100 ms time deadband.
pub const FLOW: TagId = 2;
/// Integer tag with an absolute value deadband of 5.
pub const LEVEL: TagId = 3;
/// Boolean tag without filtering.
pub const PUMP_RUNNING: TagId = 4;
/// String tag.
pub const OPERATOR_NOTE: TagId = 5;

/// Time deadband interval of [`FLOW`], in milliseconds.
pub const FLOW_DEADBAND_MS: u32 = 100;

pub fn temperature_tag() -> TagConfig {
    TagConfig::new(TEMPERATURE, "BOILER.TEMPERATURE", DataType::Double).with_range(Some(0.0), Some(120.0))
}

pub fn flow_tag() -> TagConfig {
    TagConfig::new(FLOW, "BOILER.FLOW", DataType::Double).with_time_deadband(FLOW_DEADBAND_MS, true)
}

pub fn level_tag() -> TagConfig {
    TagConfig::new(LEVEL, "BOILER.LEVEL", DataType::Integer)
        .with_value_deadband(ValueDeadbandType::Absolute, 5.0)
}

pub fn pump_tag() -> TagConfig {
    TagConfig::new(PUMP_RUNNING, "BOILER.PUMP_RUNNING", DataType::Boolean)
}

pub fn note_tag() -> TagConfig {
    TagConfig::new(OPERATOR_NOTE, "BOILER.NOTE", DataType::String)
}

/// Equipment "BOILER" with an alive tag, a comm fault tag and the five tags above.
pub fn boiler_equipment() -> EquipmentConfig {
    EquipmentConfig::new(10, "BOILER")
        .with_alive_tag(ALIVE_TAG, ALIVE_INTERVAL_MS)
        .with_comm_fault_tag(COMM_FAULT_TAG, false)
        .with_tag(temperature_tag())
        .with_tag(flow_tag())
        .with_tag(level_tag())
        .with_tag(pump_tag())
        .with_tag(note_tag())
}

/// [`boiler_equipment`] plus two sub-equipments with their own comm fault tags.
pub fn boiler_with_sub_equipments() -> EquipmentConfig {
    boiler_equipment()
        .with_sub_equipment(
            SubEquipmentConfig::new(11, "BOILER.BURNER")
                .with_alive_tag(1100, 5_000)
                .with_comm_fault_tag(1101, true),
        )
        .with_sub_equipment(SubEquipmentConfig::new(12, "BOILER.VALVES").with_comm_fault_tag(1201, false))
}
