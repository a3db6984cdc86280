//! Core error types for statusgate-core.
//!
//! This module defines the error hierarchy using thiserror. Note that
//! document normalization is deliberately absent from this hierarchy:
//! it is total and degrades field-by-field instead of failing.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for statusgate-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Transport-related errors (document store reads and writes)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the document store transport.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying HTTP request failed (network, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Store returned HTTP {code}")]
    Status { code: u16 },

    /// The write was rejected because the version token is stale.
    /// The caller must re-read and rebuild before retrying.
    #[error("Write conflict: version token is stale")]
    Conflict,

    /// The store did not return a version token on read
    #[error("Store response carried no version token")]
    MissingVersionToken,

    /// The configured document location is not a valid URL
    #[error("Invalid document location: {0}")]
    InvalidLocation(#[from] url::ParseError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
