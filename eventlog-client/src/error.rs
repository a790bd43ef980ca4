//! Error types for eventlog-client.

use eventlog_core::error::EventLogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Core(#[from] EventLogError),
}

impl ClientError {
    /// Message from the backend's `{error}` body, if this is a backend rejection.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Result type alias for eventlog-client operations.
pub type ClientResult<T> = Result<T, ClientError>;
