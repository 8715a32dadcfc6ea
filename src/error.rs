//! Error types for the shelfbot crate.

use thiserror::Error;

/// Main error type for shelfbot operations.
#[derive(Error, Debug)]
pub enum BotError {
    /// HTTP request completed with a non-success status code.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Network request error (connection, TLS, timeout).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local I/O error (temp-file relay).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable is missing.
    #[error("missing environment variable {0}")]
    MissingEnv(&'static str),

    /// Environment variable is present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Messaging transport returned an error response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Invalid or unexpected response from the storage service.
    #[error("invalid response from server")]
    InvalidResponse,
}

/// Result type alias for shelfbot operations.
pub type Result<T> = std::result::Result<T, BotError>;
