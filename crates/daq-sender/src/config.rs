//! Sender configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use daq_filters::DEFAULT_MAX_FUTURE_SKEW_MS;

use crate::error::{SenderError, SenderResult};

/// Default name of the time deadband timer thread.
pub const DEFAULT_TIMER_THREAD_NAME: &str = "daq-time-deadband";

/// Runtime options of an [`crate::EquipmentMessageSender`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Suppress alive heartbeats arriving faster than half their interval.
    pub alive_filtering: bool,
    /// Tolerated source clock drift into the future, in milliseconds.
    pub max_future_skew_ms: u64,
    /// Name of the thread running time deadband flushes.
    pub timer_thread_name: String,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            alive_filtering: false,
            max_future_skew_ms: DEFAULT_MAX_FUTURE_SKEW_MS.unsigned_abs(),
            timer_thread_name: DEFAULT_TIMER_THREAD_NAME.to_string(),
        }
    }
}

impl SenderConfig {
    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> SenderConfigBuilder {
        SenderConfigBuilder::default()
    }

    /// Tolerated source clock drift.
    #[must_use]
    pub fn max_future_skew(&self) -> Duration {
        Duration::from_millis(self.max_future_skew_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timer thread name is empty or contains a NUL byte.
    pub fn validate(&self) -> SenderResult<()> {
        if self.timer_thread_name.trim().is_empty() {
            return Err(SenderError::invalid_configuration("timer_thread_name must not be empty"));
        }
        if self.timer_thread_name.contains('\0') {
            return Err(SenderError::invalid_configuration(
                "timer_thread_name must not contain NUL bytes",
            ));
        }
        Ok(())
    }
}

/// Builder for [`SenderConfig`].
#[derive(Debug, Default)]
pub struct SenderConfigBuilder {
    config: SenderConfig,
}

impl SenderConfigBuilder {
    /// Enable or disable alive filtering.
    #[must_use]
    pub fn alive_filtering(mut self, enabled: bool) -> Self {
        self.config.alive_filtering = enabled;
        self
    }

    /// Set the tolerated future clock drift.
    #[must_use]
    pub fn max_future_skew(mut self, skew: Duration) -> Self {
        self.config.max_future_skew_ms = u64::try_from(skew.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the timer thread name.
    #[must_use]
    pub fn timer_thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.timer_thread_name = name.into();
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> SenderResult<SenderConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
