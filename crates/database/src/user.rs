//! User CRUD operations.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DatabaseError, Result};
use crate::models::User;

/// Insert a user if not already present.
///
/// Idempotent: an existing row is left untouched, including its nickname.
/// Use [`set_nick`] for explicit nickname updates.
pub async fn upsert_user(pool: &SqlitePool, id: &str, nick: &str) -> Result<()> {
    debug!(user_id = id, nick, "upserting user");

    sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (id, nick)
        VALUES (?, ?)
        "#,
    )
    .bind(id)
    .bind(nick)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a user's nickname (last-write-wins).
pub async fn set_nick(pool: &SqlitePool, id: &str, nick: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET nick = ?
        WHERE id = ?
        "#,
    )
    .bind(nick)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, nick
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// Count total users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM users
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
