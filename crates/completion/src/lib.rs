//! Chat completion client for the relay bot.
//!
//! Wraps the OpenAI-style `/v1/chat/completions` endpoint: an ordered list
//! of role-tagged messages goes out, answer text plus token usage comes
//! back. Single-shot requests, no retry.

pub mod api_types;
mod client;
mod config;
mod error;

pub use api_types::{ChatMessage, Usage};
pub use client::{Completion, CompletionClient};
pub use config::{CompletionConfig, CompletionConfigBuilder};
pub use error::CompletionError;
