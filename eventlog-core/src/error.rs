//! Error types for eventlog-core.

use thiserror::Error;

/// Errors that can occur outside of field validation.
#[derive(Error, Debug)]
pub enum EventLogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid date/time '{0}'. Expected RFC 3339 or YYYY-MM-DD")]
    InvalidTimestamp(String),
}

/// Result type alias for eventlog-core operations.
pub type EventLogResult<T> = Result<T, EventLogError>;
