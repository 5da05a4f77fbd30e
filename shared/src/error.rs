//! Error types for the calendar skill.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a skill request.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Slot values that cannot form a calendar event
    #[error("Validation error: {0}")]
    Validation(String),

    /// Service account credentials or token exchange failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Calendar API rejected the request
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No registered handler accepted the request
    #[error("No handler for request: {0}")]
    NoHandler(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Config(_) => "config",
            Error::Validation(_) => "validation",
            Error::Auth(_) => "auth",
            Error::Calendar(_) => "calendar",
            Error::Http(_) => "http",
            Error::Io(_) => "io",
            Error::Serialization(_) => "serialization",
            Error::NoHandler(_) => "no_handler",
            Error::Internal(_) => "internal",
        }
    }
}
