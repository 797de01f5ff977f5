//! Error types for the realtime module.

use thiserror::Error;

/// Errors that can occur in fan-out operations.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// Too many concurrent subscribers.
    #[error("subscriber limit reached: max {0}")]
    SubscriberLimit(usize),

    /// Subscriber not found.
    #[error("subscriber not found: {0}")]
    SubscriberNotFound(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
