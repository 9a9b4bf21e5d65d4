//! Value deadband.
//!
//! A numeric update whose change relative to the tag's current value stays
//! within the configured magnitude is not worth sending. The deadband is only
//! evaluated between values of the same quality code.

use daq_core::{CurrentValue, SourceQuality, TagConfig, TagValue, ValueUpdate};

/// True if the update falls inside the tag's value deadband.
///
/// Returns false when:
/// - the tag has no value deadband or is not numeric
/// - either value is missing or not numeric
/// - the quality code changes
/// - a `*ValueDescrChange` deadband sees a new value description
#[must_use]
pub fn is_value_deadband_filtered(
    tag: &TagConfig,
    current: &CurrentValue,
    update: &ValueUpdate,
    new_quality: &SourceQuality,
) -> bool {
    let address = &tag.address;
    if !address.is_value_deadband_enabled() || !tag.data_type.is_numeric() {
        return false;
    }
    if current.quality.code() != new_quality.code() {
        return false;
    }
    let (Some(current_value), Some(new_value)) = (&current.value, &update.value) else {
        return false;
    };
    let kind = address.value_deadband_type;
    if kind.requires_unchanged_description()
        && current.value_description != update.value_description
    {
        return false;
    }

    let Some(delta) = absolute_difference(current_value, new_value) else {
        return false;
    };
    let deadband = f64::from(address.value_deadband);

    if kind.is_relative() {
        let Some(reference) = current_value.as_f64() else {
            return false;
        };
        if delta <= 0.0 {
            return true;
        }
        if reference.abs() < f64::MIN_POSITIVE {
            return false;
        }
        delta < reference.abs() * deadband / 100.0
    } else {
        delta < deadband
    }
}

/// `|a - b|`, exact for integers.
fn absolute_difference(a: &TagValue, b: &TagValue) -> Option<f64> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        let diff = i128::from(x) - i128::from(y);
        return Some(diff.unsigned_abs() as f64);
    }
    let (x, y) = (a.as_f64()?, b.as_f64()?);
    let diff = (x - y).abs();
    diff.is_finite().then_some(diff)
}
