//! Relay error types.

use thiserror::Error;

/// Errors that can occur while handling events or loading configuration.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Error reading a config or profile file.
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a config or profile file.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The profile list was empty or a trigger pattern failed to compile.
    #[error("invalid profile set: {0}")]
    InvalidProfiles(String),

    /// No profile with the requested name exists.
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    /// Error from the persistence layer.
    #[error("database error: {0}")]
    Database(#[from] database::DatabaseError),

    /// Error from the completion API client.
    #[error("completion error: {0}")]
    Completion(#[from] completion::CompletionError),

    /// Error from the chat transport.
    #[error("chat error: {0}")]
    Chat(#[from] bot_core::ChatError),

    /// A message identifier failed to decode.
    #[error("session policy error: {0}")]
    Session(#[from] bot_core::SnowflakeError),

    /// The inbound event stream ended unexpectedly.
    #[error("message stream ended")]
    StreamEnded,
}
