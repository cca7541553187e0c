//! Event bus error types.

use thiserror::Error;

/// Errors that can occur during bus operations.
#[derive(Debug, Error)]
pub enum BusError {
    /// Publishing a message failed; the message was not appended.
    #[error("Failed to publish to topic '{topic}' with key '{key}': {reason}")]
    PublishFailed {
        topic: String,
        key: String,
        reason: String,
    },

    /// The referenced topic does not exist.
    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    /// The referenced partition offset does not exist.
    #[error("Unknown offset {offset} in topic '{topic}' partition {partition}")]
    UnknownOffset {
        topic: String,
        partition: usize,
        offset: u64,
    },

    /// Payload serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for bus results.
pub type Result<T> = std::result::Result<T, BusError>;
