//! Event handling and completion assembly for the relay bot.
//!
//! This crate wires the pieces together: JSON configuration and persona
//! profiles, the idle-session policy, the conversation store, and the
//! completion client. The concrete chat platform stays behind the
//! [`bot_core::ChatClient`] trait and a stream of inbound messages.
//!
//! # Example
//!
//! ```no_run
//! use bot_core::NoopChat;
//! use completion::{CompletionClient, CompletionConfig};
//! use database::Database;
//! use relay::{
//!     load_config, load_profiles, run_with_shutdown, HandlerOptions, MessageHandler,
//!     ProfileStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("data/config.json")?;
//! let profiles = ProfileStore::new(load_profiles("data/profiles.json")?)?;
//!
//! let db = Database::connect("sqlite:data/relay.db?mode=rwc").await?;
//! db.migrate().await?;
//!
//! let client = CompletionClient::new(
//!     CompletionConfig::builder().api_key(&config.gpt_api_key).build(),
//! )?;
//!
//! let handler = MessageHandler::new(
//!     NoopChat, // a real ChatClient implementation in production
//!     db,
//!     client,
//!     profiles,
//!     HandlerOptions {
//!         notify_on_error: config.notify_on_error,
//!         ..Default::default()
//!     },
//! );
//!
//! // In production: the platform's event stream and a ctrl-c future
//! let events = futures::stream::pending();
//! run_with_shutdown(&handler, events, std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```

mod assembler;
mod commands;
mod config;
mod error;
mod handler;
mod profile;
mod runner;

pub use assembler::Assembler;
pub use commands::{help_text, parse_command, Command};
pub use config::{load_config, load_profiles, profiles_from_json, RelayConfig};
pub use error::RelayError;
pub use handler::{HandleResult, HandlerOptions, MessageHandler};
pub use profile::{Profile, ProfileStore};
pub use runner::run_with_shutdown;
