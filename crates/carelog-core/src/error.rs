//! Error types for carelog.

use thiserror::Error;

/// Result type alias using carelog's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for carelog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(uuid::Uuid),

    /// Patient not found
    #[error("Patient not found: {0}")]
    PatientNotFound(String),

    /// Invalid input
    #[error("{0}")]
    InvalidInput(String),

    /// Storage backend does not implement the requested operation
    #[error("Not implemented: {0}")]
    Unimplemented(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
