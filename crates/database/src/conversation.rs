//! Conversation turn CRUD operations.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::ConversationTurn;

/// Insert a new turn with an empty answer.
///
/// Fails with [`DatabaseError::AlreadyExists`] if a turn with this message
/// id was already recorded.
pub async fn append_turn(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    question: &str,
    channel_id: &str,
) -> Result<()> {
    debug!(turn_id = id, user_id, "appending turn");

    sqlx::query(
        r#"
        INSERT INTO conversations (id, user_id, question, answer, channel_id)
        VALUES (?, ?, ?, '', ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(question)
    .bind(channel_id)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "ConversationTurn",
                    id: id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Record the completion answer for a turn.
///
/// Fails with [`DatabaseError::NotFound`] if the turn no longer exists,
/// which can happen when a session reset cleared it between the question
/// and the answer. Never creates a row.
pub async fn record_answer(pool: &SqlitePool, id: &str, answer: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET answer = ?
        WHERE id = ?
        "#,
    )
    .bind(answer)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "ConversationTurn",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List all turns for a user in ascending message-id order.
///
/// Snowflake ids are decimal strings of varying length, so ordering is on
/// the numeric value rather than the text.
pub async fn list_turns(pool: &SqlitePool, user_id: &str) -> Result<Vec<ConversationTurn>> {
    let turns = sqlx::query_as::<_, ConversationTurn>(
        r#"
        SELECT id, user_id, question, answer, channel_id
        FROM conversations
        WHERE user_id = ?
        ORDER BY CAST(id AS INTEGER) ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(turns)
}

/// The most recent stored turn id for a user, or `None` if they have none.
pub async fn latest_turn_id(pool: &SqlitePool, user_id: &str) -> Result<Option<String>> {
    let id = sqlx::query_scalar::<_, String>(
        r#"
        SELECT id
        FROM conversations
        WHERE user_id = ?
        ORDER BY CAST(id AS INTEGER) DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Delete all turns for a user. Idempotent.
pub async fn clear_turns(pool: &SqlitePool, user_id: &str) -> Result<()> {
    debug!(user_id, "clearing conversation turns");

    sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}
