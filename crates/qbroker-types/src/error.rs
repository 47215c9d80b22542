//! Error types for qbroker
//!
//! Every failure the broker can report is client-caused; the core itself has
//! no internal error conditions.

use thiserror::Error;

/// Main error type for qbroker operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed request (empty queue name, missing payload, bad timeout)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No payload became available for a dequeue
    #[error("No messages available in queue: {0}")]
    NoMessage(String),

    /// HTTP method other than GET or POST
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),
}

impl Error {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRequest(_) => "INVALID_REQUEST",
            Error::NoMessage(_) => "NO_MESSAGE",
            Error::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
        }
    }
}

/// Result type alias for qbroker operations
pub type Result<T> = std::result::Result<T, Error>;
