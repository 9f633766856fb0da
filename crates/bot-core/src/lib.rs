//! Core types for the relay bot.
//!
//! This crate provides the platform-neutral pieces shared by the rest of the
//! workspace:
//!
//! - [`InboundMessage`] - An inbound chat event, decoupled from any SDK
//! - [`ChatClient`] - The outbound transport seam (send, typing, nickname)
//! - [`should_reset`] - The idle-session reset policy
//! - [`UsageStats`] - Process-wide usage counters
//!
//! The concrete chat platform connection is deliberately out of scope; an
//! embedder supplies a `ChatClient` implementation and a stream of
//! `InboundMessage`s.

mod chat;
mod message;
mod session;
mod snowflake;
mod stats;

pub use chat::{ChatClient, ChatError, NoopChat, RecordingChat, SentMessage};
pub use message::{InboundMessage, ReplyRef};
pub use session::{should_reset, IDLE_THRESHOLD};
pub use snowflake::{decode_timestamp_ms, SnowflakeError};
pub use stats::UsageStats;

// Re-export async_trait for implementors of ChatClient
pub use async_trait::async_trait;
