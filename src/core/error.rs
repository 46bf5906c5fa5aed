//! Error types for scheduler operations.

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The target queue is at capacity; the item was not admitted.
    #[error("queue full: capacity {capacity} reached")]
    QueueFull {
        /// Capacity of the queue at the time of the rejected push.
        capacity: usize,
    },
    /// The promotion loop is already running.
    #[error("scheduler already started")]
    AlreadyStarted,
    /// The scheduler has been shut down.
    #[error("scheduler shut down")]
    Shutdown,
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Application-facing result using anyhow for task execution outcomes.
pub type AppResult<T> = Result<T, anyhow::Error>;
