//! Update validator.
//!
//! Runs three checks on every valid-quality update, in order, stopping at the
//! first failure:
//!
//! 1. the source timestamp is not too far in the future
//! 2. the value is convertible to the tag's declared data type
//! 3. numeric values lie within the tag's min/max
//!
//! A failed check yields a [`Rejection`] carrying the quality the tag must be
//! invalidated with.

use std::time::Duration;

use daq_core::{QualityCode, SourceQuality, TagConfig, ValueUpdate, is_convertible};

/// Default tolerance for source clocks running ahead of the DAQ.
pub const DEFAULT_MAX_FUTURE_SKEW_MS: i64 = 300_000;

/// Outcome of a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Quality to invalidate the tag with.
    pub quality: SourceQuality,
    /// True if the rejected value itself should travel with the invalidation.
    ///
    /// False means the value is unusable and the tag keeps its current value.
    pub propagate_value: bool,
}

impl Rejection {
    fn with_value(code: QualityCode, description: impl Into<String>) -> Self {
        Self {
            quality: SourceQuality::with_description(code, description),
            propagate_value: true,
        }
    }

    fn without_value(code: QualityCode, description: impl Into<String>) -> Self {
        Self {
            quality: SourceQuality::with_description(code, description),
            propagate_value: false,
        }
    }
}

/// Validates incoming updates against a tag's configuration.
#[derive(Debug, Clone, Copy)]
pub struct UpdateValidator {
    max_future_skew_ms: i64,
}

impl Default for UpdateValidator {
    fn default() -> Self {
        Self { max_future_skew_ms: DEFAULT_MAX_FUTURE_SKEW_MS }
    }
}

impl UpdateValidator {
    /// Creates a validator tolerating `max_future_skew` of source clock drift.
    #[must_use]
    pub fn new(max_future_skew: Duration) -> Self {
        let skew = i64::try_from(max_future_skew.as_millis()).unwrap_or(i64::MAX);
        Self { max_future_skew_ms: skew }
    }

    /// Tolerated drift in milliseconds.
    #[must_use]
    pub fn max_future_skew_ms(&self) -> i64 {
        self.max_future_skew_ms
    }

    /// Runs all checks.
    ///
    /// # Errors
    ///
    /// Returns the [`Rejection`] of the first failing check.
    pub fn validate(&self, tag: &TagConfig, update: &ValueUpdate, received_at: i64) -> Result<(), Rejection> {
        self.check_timestamp(update, received_at)?;
        Self::check_convertible(tag, update)?;
        Self::check_range(tag, update)
    }

    /// Rejects updates stamped more than the tolerated skew after `received_at`.
    ///
    /// # Errors
    ///
    /// Returns a [`QualityCode::FutureSourceTimestamp`] rejection.
    pub fn check_timestamp(&self, update: &ValueUpdate, received_at: i64) -> Result<(), Rejection> {
        if update.source_timestamp.saturating_sub(received_at) > self.max_future_skew_ms {
            return Err(Rejection::with_value(
                QualityCode::FutureSourceTimestamp,
                "Value received with source timestamp in the future!",
            ));
        }
        Ok(())
    }

    /// Rejects values that cannot be converted to the tag's type.
    ///
    /// Missing values and tags of unknown type always pass.
    ///
    /// # Errors
    ///
    /// Returns a [`QualityCode::ConversionError`] rejection that does not
    /// carry the value.
    pub fn check_convertible(tag: &TagConfig, update: &ValueUpdate) -> Result<(), Rejection> {
        let Some(value) = &update.value else {
            return Ok(());
        };
        if !tag.data_type.is_known() || is_convertible(value, &tag.data_type) {
            return Ok(());
        }
        Err(Rejection::without_value(
            QualityCode::ConversionError,
            format!(
                "The value ({value}) received for tag {} and the tag's type ({}) are not compatible.",
                tag.id, tag.data_type
            ),
        ))
    }

    /// Rejects numeric values outside the tag's min/max.
    ///
    /// # Errors
    ///
    /// Returns a [`QualityCode::OutOfBounds`] rejection that carries the value.
    pub fn check_range(tag: &TagConfig, update: &ValueUpdate) -> Result<(), Rejection> {
        match &update.value {
            Some(value) if !tag.is_in_range(value) => Err(Rejection::with_value(
                QualityCode::OutOfBounds,
                format!("source value is out of bounds ({})", tag.range_description()),
            )),
            _ => Ok(()),
        }
    }
}
