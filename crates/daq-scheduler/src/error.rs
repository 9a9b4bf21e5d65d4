//! Error types for the timer service.

use thiserror::Error;

/// Errors returned by [`crate::TimerService`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The service was shut down; no new tasks are accepted.
    #[error("Timer service is shut down")]
    ShutDown,

    /// A periodic task needs a non-zero period.
    #[error("Invalid period: periodic tasks need a period greater than zero")]
    InvalidPeriod,

    /// The timer thread could not be spawned.
    #[error("Failed to spawn timer thread: {0}")]
    Spawn(String),
}

/// Result type for timer operations.
pub type TimerResult<T> = std::result::Result<T, TimerError>;
