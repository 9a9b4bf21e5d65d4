//! Filter decision engine.
//!
//! Compares an incoming update with the value a tag currently holds and
//! decides whether it is worth sending to the server.

use daq_core::{CurrentValue, FilterType, SourceQuality, TagConfig, ValueUpdate};

use crate::deadband::is_value_deadband_filtered;

/// Classifies an update against the tag's current value.
///
/// Checks run in this order, first match wins:
///
/// 1. [`FilterType::OldUpdate`]: the update is not newer than the current
///    value (see [`is_older_update`]). A stale update that also repeats the
///    current state is reported as the repeat instead.
/// 2. [`FilterType::ValueDeadband`]: the numeric change is inside the tag's
///    value deadband.
/// 3. [`FilterType::RepeatedValue`] / [`FilterType::RepeatedInvalid`]: value,
///    description and quality match the current state.
///
/// Without a current value nothing is filtered. The update's value is
/// expected to be cast to the tag's data type already.
#[must_use]
pub fn classify(
    tag: &TagConfig,
    current: Option<&CurrentValue>,
    update: &ValueUpdate,
    new_quality: &SourceQuality,
) -> FilterType {
    let Some(current) = current else {
        return FilterType::NoFiltering;
    };

    let repeat = check_repeated(tag, current, update, new_quality);
    if is_older_update(current, update.source_timestamp, new_quality) {
        tracing::trace!(
            tag_id = tag.id,
            current_ts = current.source_timestamp,
            new_ts = update.source_timestamp,
            "update is not newer than current value"
        );
        return match repeat {
            FilterType::RepeatedValue | FilterType::RepeatedInvalid => repeat,
            _ => FilterType::OldUpdate,
        };
    }
    repeat
}

/// True if an update stamped `new_timestamp` must not override `current`.
///
/// A same-or-older update is stale when the current value is valid, or when
/// both the current value and the update are invalid. A valid update may
/// still replace an invalid current value of the same age.
#[must_use]
pub fn is_older_update(current: &CurrentValue, new_timestamp: i64, new_quality: &SourceQuality) -> bool {
    if new_timestamp > current.source_timestamp {
        return false;
    }
    current.quality.is_valid() || !new_quality.is_valid()
}

fn check_repeated(
    tag: &TagConfig,
    current: &CurrentValue,
    update: &ValueUpdate,
    new_quality: &SourceQuality,
) -> FilterType {
    match (&current.value, &update.value) {
        (None, Some(_)) => return FilterType::NoFiltering,
        (Some(_), _) if current.value != update.value => {
            return if is_value_deadband_filtered(tag, current, update, new_quality) {
                FilterType::ValueDeadband
            } else {
                FilterType::NoFiltering
            };
        }
        _ => {}
    }

    if !current
        .value_description
        .eq_ignore_ascii_case(&update.value_description)
    {
        return FilterType::NoFiltering;
    }

    if current.quality.code() != new_quality.code() {
        return FilterType::NoFiltering;
    }
    if new_quality.is_valid() {
        FilterType::RepeatedValue
    } else if current.quality.description() == new_quality.description() {
        FilterType::RepeatedInvalid
    } else {
        FilterType::NoFiltering
    }
}
