//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user the bot has seen at least one triggering message from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Platform-assigned user identifier.
    pub id: String,
    /// Last recorded display nickname.
    pub nick: String,
}

/// One question/answer turn in a user's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ConversationTurn {
    /// Platform message identifier of the question (snowflake, time-sortable).
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Question text as received.
    pub question: String,
    /// Completion answer; empty until the response is recorded.
    pub answer: String,
    /// Channel the question arrived in.
    pub channel_id: String,
}

impl ConversationTurn {
    /// True once an answer has been recorded for this turn.
    pub fn is_answered(&self) -> bool {
        !self.answer.is_empty()
    }
}
