//! Error types for store operations.

use thiserror::Error;

/// Error type for the file-backed configuration store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file unreadable or unwritable.
    #[error("IO error: {0}")]
    Io(String),

    /// Stored text could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),

    /// Input rejected on the administrative write path.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}
