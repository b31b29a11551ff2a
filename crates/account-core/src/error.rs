//! Error types for the account client
//!
//! This module defines all error types used throughout the crate, and the
//! four-way classification every user-facing operation ends in.

use thiserror::Error;

/// Result type alias for account operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the account client
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed account record, detected locally before any network call
    #[error("Invalid account: {message}")]
    Validation {
        /// Offending field, when known
        field: Option<String>,
        /// Error message
        message: String,
    },

    /// The server answered `result=false`
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// The server could not be reached
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Response body is not a well-formed envelope
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Account not held by the store
    #[error("Account not found: {0}")]
    NotFound(String),

    /// Account with this orgno is already held by the store
    #[error("Duplicate orgno: {0}")]
    Duplicate(i64),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport errors other than an unreachable host
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// The four outcome classes every failure falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local record failed validation; never sent
    Validation,
    /// Server refused the operation
    Rejected,
    /// Server unreachable
    Connection,
    /// Anything else, including malformed envelopes
    Unknown,
}

impl Error {
    /// Create a validation error for a specific field
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    /// Create a validation error not tied to a single field
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: msg.into(),
        }
    }

    /// Create a server rejection error
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Classify this error into one of the four outcome classes
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Rejected(_) => ErrorKind::Rejected,
            Error::Connection(_) => ErrorKind::Connection,
            _ => ErrorKind::Unknown,
        }
    }

    /// The offending field of a validation error
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}
