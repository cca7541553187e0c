//! Order store error types.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation.
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Record serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for store results.
pub type Result<T> = std::result::Result<T, StoreError>;
