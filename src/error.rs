//! Error types for memchat
//!
//! This module defines the error types used throughout the client, using
//! `thiserror` for ergonomic error handling.
//!
//! Two families are kept apart:
//!
//! - [`MemchatError`] covers local failures (configuration, IO, terminal).
//! - [`TransportError`] covers anything that went wrong between sending a
//!   request and decoding its body. Transport failures are logged and never
//!   shown to the user as an alert.

use thiserror::Error;

/// Main error type for memchat operations
#[derive(Error, Debug)]
pub enum MemchatError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server rejected a one-shot command at the application level
    #[error("Server rejected request: {0}")]
    Rejected(String),

    /// A one-shot command could not reach the server
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failure to complete a request/response exchange with the server
///
/// Timeouts, refused connections and malformed bodies all land here and are
/// handled identically by the client.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The body was not valid JSON for the expected shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body was JSON but carried neither a result nor an error
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Result type alias for memchat operations
///
/// Uses `anyhow::Error` so call sites can attach context while still
/// downcasting to [`MemchatError`] when needed.
pub type Result<T> = anyhow::Result<T>;
