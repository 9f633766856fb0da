//! Completion client error types.

use thiserror::Error;

/// Errors that can occur during a completion request.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Failed to build the HTTP client.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Network-level failure sending the request.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),
}
