//! Result and error types for the core library

use thiserror::Error;

/// Failure of a single call against the banking provider
///
/// Lets callers tell "the provider returned nothing" apart from
/// "the request failed".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Provider returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Map an HTTP status to the matching error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth(format!("provider rejected the request (HTTP {})", status)),
            other => Self::Status(other),
        }
    }
}

/// Result of a provider call
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Core library error type
///
/// Provider failures keep their own `ProviderError`; file and parse
/// failures in `config` carry `anyhow` context instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
