//! Inbound message types.

use serde::{Deserialize, Serialize};

/// Reference to a message this one replies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRef {
    /// Identifier of the replied-to message.
    pub message_id: String,
    /// Whether the replied-to message was authored by the bot itself.
    pub bot_authored: bool,
}

/// An inbound chat event, decoupled from any platform SDK.
///
/// Message identifiers are snowflakes: decimal strings whose numeric value
/// embeds a millisecond timestamp (see [`crate::decode_timestamp_ms`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform message identifier.
    pub id: String,
    /// Platform identifier of the author.
    pub author_id: String,
    /// Display nickname of the author at send time.
    pub author_nick: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Message text.
    pub content: String,
    /// Set when this message replies to another.
    pub reply_to: Option<ReplyRef>,
    /// Whether the bot was mentioned in the message.
    pub mentions_bot: bool,
    /// Whether the bot itself authored the message.
    pub from_bot: bool,
}

impl InboundMessage {
    /// True when this message is a reply to one of the bot's own messages.
    pub fn is_reply_to_bot(&self) -> bool {
        self.reply_to.as_ref().is_some_and(|r| r.bot_authored)
    }
}
