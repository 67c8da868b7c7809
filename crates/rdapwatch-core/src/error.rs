//! Error types for rdapwatch
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for rdapwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for rdapwatch
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure talking to the lookup service
    #[error("Network error: {0}")]
    Network(String),

    /// Lookup service answered with a status other than 200 or 404
    #[error("Status code: {0}")]
    HttpStatus(u16),

    /// Malformed response body or missing expected fields
    #[error("Parse error: {0}")]
    Parse(String),

    /// Desktop notification could not be raised
    #[error("Notification error: {0}")]
    Notification(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),
}

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
