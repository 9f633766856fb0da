//! The per-event message handler.
//!
//! Connects an inbound chat event to the session policy, the conversation
//! store, and the completion assembler, and sends the reply back out
//! through the [`ChatClient`] seam.

use std::sync::Arc;

use bot_core::{should_reset, ChatClient, InboundMessage, UsageStats};
use completion::CompletionClient;
use database::{conversation, user, Database};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::assembler::Assembler;
use crate::commands::{help_text, parse_command, Command};
use crate::error::RelayError;
use crate::profile::ProfileStore;

/// Options for the message handler.
#[derive(Debug, Clone)]
pub struct HandlerOptions {
    /// Bot display name used in the help message.
    pub bot_name: String,

    /// Whether to reply with an apology when the completion call fails.
    pub notify_on_error: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            bot_name: "relay".to_string(),
            notify_on_error: true,
        }
    }
}

/// Result of handling a single inbound event.
#[derive(Debug)]
pub enum HandleResult {
    /// A completion reply was sent.
    Replied { channel_id: String, text: String },
    /// A mention command was handled.
    Command,
    /// The event required no action.
    Skipped { reason: &'static str },
    /// Handling failed; the process keeps serving.
    Failed(RelayError),
}

/// Handles inbound chat events one at a time.
///
/// Event delivery is assumed serialized by the surrounding platform; the
/// handler itself takes `&self` everywhere and keeps its mutable state
/// (profile selection, counters, last active channel) behind locks and
/// atomics so concurrent delivery would still be safe.
pub struct MessageHandler<C: ChatClient> {
    chat: C,
    db: Database,
    profiles: ProfileStore,
    assembler: Assembler,
    stats: Arc<UsageStats>,
    options: HandlerOptions,
    last_channel: RwLock<Option<String>>,
}

impl<C: ChatClient> MessageHandler<C> {
    /// Create a new handler.
    pub fn new(
        chat: C,
        db: Database,
        client: CompletionClient,
        profiles: ProfileStore,
        options: HandlerOptions,
    ) -> Self {
        let stats = Arc::new(UsageStats::new());
        let assembler = Assembler::new(db.clone(), client, Arc::clone(&stats));

        Self {
            chat,
            db,
            profiles,
            assembler,
            stats,
            options,
            last_channel: RwLock::new(None),
        }
    }

    /// Get the usage counters.
    pub fn stats(&self) -> &UsageStats {
        &self.stats
    }

    /// Get the chat client.
    pub fn chat(&self) -> &C {
        &self.chat
    }

    /// Handle one inbound event.
    pub async fn handle(&self, msg: &InboundMessage) -> HandleResult {
        self.stats.message_scanned();

        // The bot's own messages only refresh the last active channel,
        // which the shutdown sequence posts to.
        if msg.from_bot {
            *self.last_channel.write().await = Some(msg.channel_id.clone());
            return HandleResult::Skipped {
                reason: "message from self",
            };
        }

        if msg.mentions_bot {
            if let Some(command) = parse_command(&msg.content) {
                return self.handle_command(msg, command).await;
            }
        }

        let triggered = msg.is_reply_to_bot() || self.profiles.trigger_matches(&msg.content).await;
        if !triggered {
            return HandleResult::Skipped {
                reason: "no trigger",
            };
        }

        match self.relay_completion(msg).await {
            Ok(text) => HandleResult::Replied {
                channel_id: msg.channel_id.clone(),
                text,
            },
            Err(e) => {
                error!(author = %msg.author_id, "failed to produce a reply: {}", e);
                if self.options.notify_on_error {
                    let apology = "Sorry, I couldn't come up with a reply. Please try again.";
                    if let Err(send_err) =
                        self.chat.send_reply(&msg.channel_id, apology, &msg.id).await
                    {
                        warn!("failed to send error notice: {}", send_err);
                    }
                }
                HandleResult::Failed(e)
            }
        }
    }

    /// Record the message, run the session policy, and produce a reply.
    async fn relay_completion(&self, msg: &InboundMessage) -> Result<String, RelayError> {
        let pool = self.db.pool();

        // Idle-session check against the most recent stored turn
        let latest = conversation::latest_turn_id(pool, &msg.author_id).await?;
        if should_reset(Some(&msg.id), latest.as_deref())? {
            info!(author = %msg.author_id, "idle threshold exceeded, resetting session");
            conversation::clear_turns(pool, &msg.author_id).await?;
        }

        user::upsert_user(pool, &msg.author_id, &msg.author_nick).await?;
        let stored = user::get_user(pool, &msg.author_id).await?;
        if stored.nick != msg.author_nick {
            user::set_nick(pool, &msg.author_id, &msg.author_nick).await?;
        }

        conversation::append_turn(pool, &msg.id, &msg.author_id, &msg.content, &msg.channel_id)
            .await?;

        self.stats.question_asked();
        if let Err(e) = self.chat.send_typing(&msg.channel_id).await {
            warn!("failed to send typing indicator: {}", e);
        }

        let profile = self.profiles.current().await;
        let answer = self
            .assembler
            .complete(&msg.author_id, &msg.id, &profile)
            .await?;

        self.chat
            .send_reply(&msg.channel_id, &answer, &msg.id)
            .await?;
        self.stats.answer_sent();

        Ok(answer)
    }

    /// Handle a mention command.
    async fn handle_command(&self, msg: &InboundMessage, command: Command) -> HandleResult {
        debug!(author = %msg.author_id, ?command, "handling command");

        let reply = match command {
            Command::SwitchProfile(name) => match self.profiles.set_current(&name).await {
                Ok(profile) => {
                    self.stats.profile_changed();
                    if let Err(e) = self.chat.set_nickname(&profile.name).await {
                        warn!("failed to change nickname: {}", e);
                    }
                    format!("Profile changed to {}", profile.name)
                }
                Err(RelayError::UnknownProfile(_)) => "Profile not found".to_string(),
                Err(e) => return HandleResult::Failed(e),
            },
            Command::Stats => format!("```\n{}\n```", self.stats.summary()),
            Command::Help => help_text(&self.options.bot_name, self.profiles.list()),
        };

        if let Err(e) = self.chat.send_message(&msg.channel_id, &reply).await {
            warn!("failed to send command reply: {}", e);
            return HandleResult::Failed(e.into());
        }

        HandleResult::Command
    }

    /// Shutdown sequence: reset the nickname and post a goodbye plus the
    /// usage summary to the last active channel. Every step is best-effort.
    pub async fn shutdown(&self) {
        info!("shutting down");

        if let Err(e) = self.chat.set_nickname("").await {
            warn!("failed to reset nickname: {}", e);
            if let Some(channel) = self.last_channel.read().await.as_deref() {
                let _ = self
                    .chat
                    .send_message(channel, "Error resetting nickname! Please reset it manually.")
                    .await;
            }
        }

        let channel = self.last_channel.read().await.clone();
        if let Some(channel) = channel {
            if let Err(e) = self
                .chat
                .send_message(&channel, "Bot shutting down for maintenance!")
                .await
            {
                warn!("failed to send goodbye message: {}", e);
            }
            let summary = format!("Stats:\n```\n{}\n```", self.stats.summary());
            if let Err(e) = self.chat.send_message(&channel, &summary).await {
                warn!("failed to send stats message: {}", e);
            }
        }
    }
}
