//! Console relay bot example.
//!
//! Wires the full stack against a console transport: each line typed on
//! stdin becomes an inbound message from a fake user, and outbound actions
//! are printed to stdout. Useful for exercising the session policy and
//! profiles without a chat platform connection.
//!
//! Run with: cargo run -p relay --example console_bot
//!
//! Expects `data/config.json` ({"botToken": ..., "gptApiKey": ..., "log": false})
//! and `data/profiles.json` (array of {name, regex, context, question, answer}).

use bot_core::{async_trait, ChatClient, ChatError, InboundMessage};
use completion::{CompletionClient, CompletionConfig};
use database::Database;
use futures::channel::mpsc;
use relay::{load_config, load_profiles, run_with_shutdown, HandlerOptions, MessageHandler, ProfileStore};

/// Platform epoch offset used to mint snowflake ids for console input.
const SNOWFLAKE_EPOCH_MS: u64 = 1_420_070_400_000;

/// Chat client that prints every action to stdout.
struct ConsoleChat;

#[async_trait]
impl ChatClient for ConsoleChat {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChatError> {
        println!("[{}] bot: {}", channel_id, text);
        Ok(())
    }

    async fn send_typing(&self, channel_id: &str) -> Result<(), ChatError> {
        println!("[{}] bot is typing...", channel_id);
        Ok(())
    }

    async fn set_nickname(&self, name: &str) -> Result<(), ChatError> {
        println!("(bot nickname is now {:?})", name);
        Ok(())
    }
}

fn snowflake_now() -> String {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before Unix epoch")
        .as_millis() as u64;
    ((now_ms - SNOWFLAKE_EPOCH_MS) << 22).to_string()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config("data/config.json")?;

    let level = if config.log {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let profiles = ProfileStore::new(load_profiles("data/profiles.json")?)?;

    let db = Database::connect("sqlite:data/relay.db?mode=rwc").await?;
    db.migrate().await?;

    let client = CompletionClient::new(
        CompletionConfig::builder()
            .api_key(&config.gpt_api_key)
            .build(),
    )?;

    let handler = MessageHandler::new(
        ConsoleChat,
        db,
        client,
        profiles,
        HandlerOptions {
            notify_on_error: config.notify_on_error,
            ..Default::default()
        },
    );

    // Feed stdin lines into the event stream from a blocking thread.
    let (tx, rx) = mpsc::unbounded::<InboundMessage>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            let msg = InboundMessage {
                id: snowflake_now(),
                author_id: "console-user".to_string(),
                author_nick: "console".to_string(),
                channel_id: "console".to_string(),
                content: line,
                reply_to: None,
                mentions_bot: false,
                from_bot: false,
            };
            if tx.unbounded_send(msg).is_err() {
                break;
            }
        }
    });

    println!("Relay bot is running. Type a message, Ctrl+C to stop.");

    run_with_shutdown(&handler, rx, async {
        tokio::signal::ctrl_c().await.expect("ctrl-c handler");
    })
    .await?;

    println!("{}", handler.stats().summary());
    Ok(())
}
