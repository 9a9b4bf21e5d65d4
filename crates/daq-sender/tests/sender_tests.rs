//! End-to-end behaviour of the equipment message sender.

mod common;

use common::{base_time, harness, harness_with};
use daq_core::prelude::*;
use daq_sender::prelude::*;
use daq_sender::ALIVE_NAME_SUFFIX;
use daq_test_helpers::prelude::*;

#[test]
fn test_first_valid_update_is_sent() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.update(TEMPERATURE, ValueUpdate::new(21.5, t0).with_description("manual read"))?);

    let sent = h.transport.messages_for(TEMPERATURE);
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.name, "BOILER.TEMPERATURE");
    assert_eq!(message.value, Some(TagValue::Double(21.5)));
    assert_eq!(message.value_description, "manual read");
    assert_eq!(message.quality, SourceQuality::ok());
    assert_eq!(message.source_timestamp, t0);
    assert!(message.daq_timestamp >= t0);

    let current = h.sender.current_value(TEMPERATURE)?.ok_or("no current value")?;
    assert_eq!(current.value, Some(TagValue::Double(21.5)));
    Ok(())
}

#[test]
fn test_value_is_cast_to_declared_type() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(42, t0))?;
    h.sender.update(LEVEL, ValueUpdate::new("17", t0))?;

    assert_eq!(h.transport.messages_for(TEMPERATURE)[0].value, Some(TagValue::Double(42.0)));
    assert_eq!(h.transport.messages_for(LEVEL)[0].value, Some(TagValue::Integer(17)));
    Ok(())
}

#[test]
fn test_repeated_value_is_audited_not_sent() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0))?);
    assert!(!h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0 + 1_000))?);

    assert_eq!(h.transport.messages_for(PUMP_RUNNING).len(), 1);
    assert_eq!(h.audit.filter_types(), vec![FilterType::RepeatedValue]);
    assert_eq!(h.audit.records()[0].source_timestamp, t0 + 1_000);
    Ok(())
}

#[test]
fn test_description_change_is_sent() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0).with_description("auto"))?;
    assert!(h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0 + 1).with_description("manual"))?);
    assert!(!h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0 + 2).with_description("MANUAL"))?);

    assert_eq!(h.transport.messages_for(PUMP_RUNNING).len(), 2);
    Ok(())
}

#[test]
fn test_stale_update_is_old_update() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(20.0, t0))?;
    assert!(!h.sender.update(TEMPERATURE, ValueUpdate::new(25.0, t0 - 500))?);

    assert_eq!(h.transport.messages_for(TEMPERATURE).len(), 1);
    assert_eq!(h.audit.filter_types(), vec![FilterType::OldUpdate]);
    let current = h.sender.current_value(TEMPERATURE)?.ok_or("no current value")?;
    assert_eq!(current.value, Some(TagValue::Double(20.0)));
    Ok(())
}

#[test]
fn test_absolute_value_deadband() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.update(LEVEL, ValueUpdate::new(10, t0))?);
    assert!(!h.sender.update(LEVEL, ValueUpdate::new(14, t0 + 1))?);
    assert!(h.sender.update(LEVEL, ValueUpdate::new(15, t0 + 2))?);

    assert_eq!(h.audit.filter_types(), vec![FilterType::ValueDeadband]);
    let values: Vec<_> = h.transport.messages_for(LEVEL).into_iter().map(|m| m.value).collect();
    assert_eq!(values, vec![Some(TagValue::Integer(10)), Some(TagValue::Integer(15))]);
    Ok(())
}

#[test]
fn test_out_of_range_twice_sends_one_invalidation() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.update(TEMPERATURE, ValueUpdate::new(150.0, t0))?);
    assert!(!h.sender.update(TEMPERATURE, ValueUpdate::new(150.0, t0 + 1_000))?);

    let sent = h.transport.messages_for(TEMPERATURE);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].quality.code(), QualityCode::OutOfBounds);
    assert_eq!(sent[0].value, Some(TagValue::Double(150.0)));
    let description = sent[0].quality.description().ok_or("missing quality description")?;
    assert!(description.contains("out of bounds"), "{description}");

    assert_eq!(h.audit.filter_types(), vec![FilterType::RepeatedInvalid]);
    let stats = h.sender.stats();
    assert_eq!(stats.invalid_sent, 1);
    assert_eq!(stats.filtered, 1);
    Ok(())
}

#[test]
fn test_back_in_range_revalidates() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(150.0, t0))?;
    assert!(h.sender.update(TEMPERATURE, ValueUpdate::new(100.0, t0 + 1))?);

    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert!(last.is_valid());
    assert_eq!(last.value, Some(TagValue::Double(100.0)));
    Ok(())
}

#[test]
fn test_unconvertible_value_invalidates_without_value() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(LEVEL, ValueUpdate::new(7, t0))?;
    assert!(h.sender.update(LEVEL, ValueUpdate::new("seven", t0 + 1))?);

    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert_eq!(last.quality.code(), QualityCode::ConversionError);
    assert_eq!(last.value, Some(TagValue::Integer(7)), "tag keeps its last good value");
    assert_eq!(last.source_timestamp, t0 + 1);
    Ok(())
}

#[test]
fn test_future_timestamp_invalidates_with_value() -> TestResult {
    let h = harness(boiler_equipment())?;
    let future = now_millis() + 10 * 60 * 1_000;

    assert!(h.sender.update(TEMPERATURE, ValueUpdate::new(30.0, future))?);

    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert_eq!(last.quality.code(), QualityCode::FutureSourceTimestamp);
    assert_eq!(last.value, Some(TagValue::Double(30.0)));
    Ok(())
}

#[test]
fn test_configured_skew_tolerates_small_drift() -> TestResult {
    let config = SenderConfig::builder().max_future_skew(std::time::Duration::from_secs(3_600)).build()?;
    let h = harness_with(boiler_equipment(), config)?;
    let future = now_millis() + 10 * 60 * 1_000;

    h.sender.update(TEMPERATURE, ValueUpdate::new(30.0, future))?;
    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert!(last.is_valid());
    Ok(())
}

#[test]
fn test_quality_change_keeps_value() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(55.0, t0).with_description("probe A"))?;
    let quality = SourceQuality::with_description(QualityCode::DataUnavailable, "probe disconnected");
    assert!(h.sender.update_quality_at(TEMPERATURE, quality.clone(), t0 + 10)?);
    assert!(!h.sender.update_quality_at(TEMPERATURE, quality, t0 + 20)?);

    let sent = h.transport.messages_for(TEMPERATURE);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].quality.code(), QualityCode::DataUnavailable);
    assert_eq!(sent[1].value, Some(TagValue::Double(55.0)));
    assert_eq!(sent[1].value_description, "probe A");
    assert_eq!(h.audit.filter_types(), vec![FilterType::RepeatedInvalid]);
    Ok(())
}

#[test]
fn test_invalidation_with_changed_description_is_sent() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(55.0, t0))?;
    h.sender.update_quality_at(TEMPERATURE, SourceQuality::with_description(QualityCode::Unknown, "a"), t0 + 1)?;
    assert!(h.sender.update_quality_at(
        TEMPERATURE,
        SourceQuality::with_description(QualityCode::Unknown, "b"),
        t0 + 2
    )?);
    assert_eq!(h.transport.messages_for(TEMPERATURE).len(), 3);
    Ok(())
}

#[test]
fn test_ok_quality_revalidates_current_value() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update(TEMPERATURE, ValueUpdate::new(55.0, t0))?;
    h.sender.update_quality_at(TEMPERATURE, SourceQuality::new(QualityCode::DataUnavailable), t0 + 1)?;
    assert!(h.sender.update_quality_at(TEMPERATURE, SourceQuality::ok(), t0 + 2)?);

    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert!(last.is_valid());
    assert_eq!(last.value, Some(TagValue::Double(55.0)));
    Ok(())
}

#[test]
fn test_first_invalidation_without_value_is_sent_then_not_audited() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();
    let quality = SourceQuality::new(QualityCode::DataUnavailable);

    assert!(h.sender.update_quality_at(FLOW + 100, quality.clone(), t0).is_err());
    assert!(h.sender.update_quality_at(TEMPERATURE, quality.clone(), t0)?);
    assert!(!h.sender.update_quality_at(TEMPERATURE, quality, t0)?);

    let sent = h.transport.messages_for(TEMPERATURE);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value, None);
    assert_eq!(h.audit.record_count(), 0);
    Ok(())
}

#[test]
fn test_update_with_quality_routes_by_quality() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update_with_quality(TEMPERATURE, ValueUpdate::new(10.0, t0), SourceQuality::ok())?;
    h.sender.update_with_quality(
        TEMPERATURE,
        ValueUpdate::new(11.0, t0 + 1),
        SourceQuality::with_description(QualityCode::ValueCorrupted, "checksum"),
    )?;

    let sent = h.transport.messages_for(TEMPERATURE);
    assert_eq!(sent.len(), 2);
    assert!(sent[0].is_valid());
    assert_eq!(sent[1].quality.code(), QualityCode::ValueCorrupted);
    assert_eq!(sent[1].value, Some(TagValue::Double(11.0)));
    Ok(())
}

#[test]
fn test_invalid_value_not_convertible_is_sent_without_value() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    h.sender.update_with_quality(
        LEVEL,
        ValueUpdate::new("garbage", t0),
        SourceQuality::new(QualityCode::ValueCorrupted),
    )?;
    let last = h.transport.last_message().ok_or("nothing sent")?;
    assert_eq!(last.value, None);
    assert_eq!(last.quality.code(), QualityCode::ValueCorrupted);
    Ok(())
}

#[test]
fn test_lookup_by_name() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.update_by_name("BOILER.NOTE", ValueUpdate::new("refilled", t0))?);
    assert!(h.sender.update_quality_by_name_at("BOILER.NOTE", SourceQuality::new(QualityCode::Unknown), t0 + 1)?);
    assert_eq!(h.transport.messages_for(OPERATOR_NOTE).len(), 2);

    assert_eq!(
        h.sender.update_by_name("BOILER.MISSING", ValueUpdate::new(1, t0)),
        Err(SenderError::UnknownTagName("BOILER.MISSING".into()))
    );
    assert!(matches!(
        h.sender.update_quality_by_name("BOILER.MISSING", SourceQuality::ok()),
        Err(SenderError::UnknownTagName(_))
    ));
    Ok(())
}

#[test]
fn test_unknown_tag_is_an_error() -> TestResult {
    let h = harness(boiler_equipment())?;
    assert_eq!(h.sender.update(999, ValueUpdate::now(1)), Err(SenderError::TagNotFound(999)));
    assert_eq!(h.sender.current_value(999), Err(SenderError::TagNotFound(999)));
    assert_eq!(h.transport.message_count(), 0);
    Ok(())
}

#[test]
fn test_transport_failure_is_logged_not_returned() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();
    h.transport.set_failing(true);

    assert!(!h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0))?);
    assert_eq!(h.sender.stats().transport_failures, 1);

    h.transport.set_failing(false);
    assert!(!h.sender.update(PUMP_RUNNING, ValueUpdate::new(true, t0 + 1))?);
    assert_eq!(h.audit.filter_types(), vec![FilterType::RepeatedValue]);
    Ok(())
}

#[test]
fn test_supervision_alive_without_filtering() -> TestResult {
    let h = harness(boiler_equipment())?;
    let t0 = base_time();

    assert!(h.sender.send_supervision_alive_at(t0)?);
    assert!(h.sender.send_supervision_alive_at(t0 + 10)?);

    let sent = h.transport.messages_for(ALIVE_TAG);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].name, format!("BOILER{ALIVE_NAME_SUFFIX}"));
    assert_eq!(sent[0].value, Some(TagValue::Long(t0)));
    assert_eq!(sent[0].priority, Priority::High);
    assert!(!sent[0].guaranteed_delivery);
    assert_eq!(sent[0].time_to_live_ms, Some(ALIVE_INTERVAL_MS));
    Ok(())
}

#[test]
fn test_alive_filtering_drops_early_heartbeats() -> TestResult {
    let config = SenderConfig::builder().alive_filtering(true).build()?;
    let h = harness_with(boiler_equipment(), config)?;
    let t0 = base_time();
    let half = i64::try_from(ALIVE_INTERVAL_MS / 2)?;

    assert!(h.sender.send_supervision_alive_at(t0)?);
    assert!(!h.sender.send_supervision_alive_at(t0 + half - 1)?);
    assert!(h.sender.send_supervision_alive_at(t0 + half)?);

    assert_eq!(h.transport.messages_for(ALIVE_TAG).len(), 2);
    let stats = h.sender.stats();
    assert_eq!(stats.alive_sent, 2);
    assert_eq!(stats.alive_suppressed, 1);
    Ok(())
}

#[test]
fn test_driver_update_on_alive_tag_goes_through_alive_path() -> TestResult {
    let h = harness(boiler_with_sub_equipments())?;
    let t0 = base_time();

    assert!(h.sender.update(1100, ValueUpdate::new(5, t0))?);

    let sent = h.transport.messages_for(1100);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].name, "BOILER.BURNER:ALIVE");
    assert_eq!(sent[0].time_to_live_ms, Some(5_000));
    assert_eq!(sent[0].value, Some(TagValue::Long(t0)));
    Ok(())
}

#[test]
fn test_configured_alive_tag_keeps_castable_driver_value() -> TestResult {
    let equipment = EquipmentConfig::new(20, "PLC")
        .with_alive_tag(2000, 1_000)
        .with_tag(TagConfig::new(2000, "PLC.ALIVE", DataType::Integer).as_control_tag());
    let h = harness(equipment)?;
    let t0 = base_time();

    h.sender.update(2000, ValueUpdate::new(3, t0).with_description("counter"))?;
    h.sender.update(2000, ValueUpdate::new(true, t0 + 1_000))?;
    h.sender.send_supervision_alive_at(t0 + 2_000)?;

    let sent = h.transport.messages_for(2000);
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].name, "PLC.ALIVE");
    assert_eq!(sent[0].value, Some(TagValue::Integer(3)));
    assert_eq!(sent[0].value_description, "counter");
    assert_eq!(sent[0].priority, Priority::High);
    assert_eq!(sent[1].value, Some(TagValue::Integer(1)));

    let expected = i32::try_from((t0 + 2_000) % i64::from(i32::MAX))?;
    assert_eq!(sent[2].value, Some(TagValue::Integer(expected)));

    let current = h.sender.current_value(2000)?.ok_or("alive tag has no current value")?;
    assert_eq!(current.source_timestamp, t0 + 2_000);
    Ok(())
}

#[test]
fn test_equipment_without_alive_tag() -> TestResult {
    let h = harness(EquipmentConfig::new(30, "BARE").with_tag(pump_tag()))?;
    assert!(!h.sender.send_supervision_alive()?);
    assert_eq!(h.transport.message_count(), 0);
    Ok(())
}

#[test]
fn test_comm_fault_sent_once_per_change() -> TestResult {
    let h = harness(boiler_with_sub_equipments())?;

    assert_eq!(h.sender.confirm_equipment_state_ok(None)?, 3);
    assert_eq!(h.sender.confirm_equipment_state_ok(None)?, 0);
    assert_eq!(h.sender.confirm_equipment_state_incorrect(Some("connection lost"))?, 3);
    assert_eq!(h.sender.confirm_equipment_state_incorrect(Some("connection lost"))?, 0);
    assert_eq!(h.sender.confirm_equipment_state_incorrect(Some("timeout"))?, 3);

    let states = h.transport.equipment_states();
    assert_eq!(states.len(), 9);

    let ok: Vec<_> = states.iter().take(3).map(|s| (s.name.as_str(), s.value)).collect();
    assert_eq!(
        ok,
        vec![("BOILER:COMM_FAULT", true), ("BOILER.BURNER:COMM_FAULT", false), ("BOILER.VALVES:COMM_FAULT", true)]
    );
    let faulty: Vec<_> = states.iter().skip(3).take(3).map(|s| s.value).collect();
    assert_eq!(faulty, vec![false, true, false]);
    assert_eq!(states[3].description.as_deref(), Some("connection lost"));

    let stats = h.sender.stats();
    assert_eq!(stats.comm_fault_sent, 9);
    assert_eq!(stats.comm_fault_repeated, 6);
    Ok(())
}

#[test]
fn test_comm_fault_retried_after_transport_failure() -> TestResult {
    let h = harness(boiler_equipment())?;
    h.transport.set_failing(true);
    assert_eq!(h.sender.confirm_equipment_state_ok(None)?, 0);
    h.transport.set_failing(false);
    assert_eq!(h.sender.confirm_equipment_state_ok(None)?, 1);
    Ok(())
}

#[test]
fn test_dynamic_deadband_tracking() -> TestResult {
    let equipment = EquipmentConfig::new(40, "DYN")
        .with_dynamic_time_deadband(true)
        .with_tag(TagConfig::new(1, "DYN.LOW", DataType::Double))
        .with_tag(TagConfig::new(2, "DYN.HIGH", DataType::Double).with_priority(Priority::High))
        .with_tag(TagConfig::new(3, "DYN.STATIC", DataType::Double).with_time_deadband(0, true));
    let h = harness(equipment)?;
    let t0 = base_time();

    assert!(h.tracker.is_tracked(1));
    assert!(h.tracker.is_tracked(2));
    assert!(!h.tracker.is_tracked(3));

    for tag_id in 1..=3 {
        h.sender.update(tag_id, ValueUpdate::new(1.0, t0))?;
    }
    assert_eq!(h.tracker.sent_count(1), 1);
    assert_eq!(h.tracker.sent_count(2), 0, "high priority tags are not counted");
    assert_eq!(h.tracker.sent_count(3), 0);

    h.tracker.activate(1);
    h.sender.update(1, ValueUpdate::new(1.0, t0 + 1))?;
    let record = h.audit.records_for(1).pop().ok_or("repeat not audited")?;
    assert!(record.dynamic_filtered);
    Ok(())
}

#[test]
fn test_tag_configuration_hooks() -> TestResult {
    let equipment = EquipmentConfig::new(40, "DYN")
        .with_dynamic_time_deadband(true)
        .with_tag(TagConfig::new(1, "DYN.LOW", DataType::Double));
    let h = harness(equipment)?;
    let t0 = base_time();

    let report = h.sender.on_tag_added(TagConfig::new(5, "DYN.NEW", DataType::Double))?;
    assert!(report.mentions("tag added"));
    assert!(report.mentions("registered with dynamic deadband tracker"));
    assert!(h.tracker.is_tracked(5));
    assert_eq!(h.sender.tag_count(), 2);

    assert_eq!(
        h.sender.on_tag_added(TagConfig::new(5, "DYN.OTHER", DataType::Double)),
        Err(SenderError::TagAlreadyExists(5))
    );
    assert_eq!(
        h.sender.on_tag_added(TagConfig::new(6, "DYN.NEW", DataType::Double)),
        Err(SenderError::Config(ConfigError::DuplicateTagName("DYN.NEW".into())))
    );
    let inverted = TagConfig::new(7, "DYN.INVERTED", DataType::Double).with_range(Some(10.0), Some(0.0));
    assert!(matches!(
        h.sender.on_tag_added(inverted),
        Err(SenderError::Config(ConfigError::InvalidRange { tag_id: 7, .. }))
    ));

    assert!(h.sender.update(5, ValueUpdate::new(1.0, t0))?);

    let renamed = TagConfig::new(5, "DYN.RENAMED", DataType::Double).with_priority(Priority::Medium);
    let report = h.sender.on_tag_updated(renamed)?;
    assert!(report.mentions("renamed to DYN.RENAMED"));
    assert!(report.mentions("unregistered from dynamic deadband tracker"));
    assert!(report.mentions("registered with dynamic deadband tracker"));
    assert!(h.tracker.is_tracked(5));

    let current = h.sender.current_value(5)?.ok_or("current value lost on update")?;
    assert_eq!(current.value, Some(TagValue::Double(1.0)));
    assert_eq!(
        h.sender.update_by_name("DYN.NEW", ValueUpdate::new(2.0, t0 + 1)),
        Err(SenderError::UnknownTagName("DYN.NEW".into()))
    );
    assert!(h.sender.update_by_name("DYN.RENAMED", ValueUpdate::new(2.0, t0 + 1))?);
    assert_eq!(h.transport.messages_for(5)[1].priority, Priority::Medium);

    let pinned = TagConfig::new(5, "DYN.RENAMED", DataType::Double).with_time_deadband(0, true);
    let report = h.sender.on_tag_updated(pinned)?;
    assert!(!report.mentions("renamed"));
    assert!(!h.tracker.is_tracked(5));

    let report = h.sender.on_tag_removed(5)?;
    assert!(report.mentions("tag removed"));
    assert!(!report.mentions("tracker"));
    assert_eq!(h.sender.tag_count(), 1);
    assert_eq!(
        h.sender.on_tag_updated(TagConfig::new(5, "DYN.RENAMED", DataType::Double)),
        Err(SenderError::TagNotFound(5))
    );
    Ok(())
}

#[test]
fn test_operations_after_shutdown_fail() -> TestResult {
    let h = harness(boiler_equipment())?;
    h.sender.shutdown();
    h.sender.shutdown();

    assert!(!h.sender.is_running());
    assert_eq!(h.sender.update(TEMPERATURE, ValueUpdate::now(1.0)), Err(SenderError::ShutDown));
    assert_eq!(h.sender.send_supervision_alive(), Err(SenderError::ShutDown));
    assert_eq!(h.sender.confirm_equipment_state_ok(None), Err(SenderError::ShutDown));
    Ok(())
}

#[test]
fn test_builder_requires_transport() {
    let result = EquipmentMessageSender::builder(boiler_equipment()).build();
    assert!(matches!(result, Err(SenderError::Config(_))));
}

#[test]
fn test_builder_rejects_invalid_equipment() {
    let equipment = boiler_equipment().with_tag(TagConfig::new(TEMPERATURE, "DUPLICATE", DataType::Double));
    let result = harness(equipment);
    assert!(matches!(result, Err(SenderError::Config(ConfigError::DuplicateTagId(TEMPERATURE)))));
}
