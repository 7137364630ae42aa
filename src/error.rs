//! Error types for the audio selection proxy.
//!
//! The selection core itself never errors - it returns "no decision" - so
//! everything here belongs to the HTTP integration layer.

use thiserror::Error;

/// Main error type for the proxy.
#[derive(Error, Debug)]
pub enum AudioProxyError {
    /// Upstream request error.
    #[error("upstream request error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] axum::http::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Session command rejected by the server.
    #[error("session command failed: {0}")]
    Command(String),
}

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, AudioProxyError>;
