//! Error types for the conversation store.

use thiserror::Error;

/// Errors surfaced by the user and conversation-turn operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Underlying SQLx failure (connection, statement, constraint).
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Schema migration failure at startup.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A lookup missed: the user was never upserted, or the turn was
    /// cleared by a session reset before the operation ran.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A turn keyed by this message id is already recorded.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
