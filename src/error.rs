//! Error types for the client library

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error types that can occur when talking to the vector-search service
/// or preparing data for it
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Column '{field}' has {actual} values, expected {expected}")]
    ColumnMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
