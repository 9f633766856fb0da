//! Outbound chat transport seam.

use async_trait::async_trait;
use thiserror::Error;

/// Error from the chat transport.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The transport failed to deliver the action.
    #[error("chat transport error: {0}")]
    Transport(String),
}

/// Trait for outbound chat platform actions.
///
/// Abstracted so the relay can run against any platform SDK (or a recording
/// stub in tests). Implementations are expected to be cheap to call; no
/// retry is performed by callers.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a plain text message to a channel.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChatError>;

    /// Send a text message as a threaded reply to a specific message.
    ///
    /// Default implementation drops the reference and sends plain text.
    async fn send_reply(
        &self,
        channel_id: &str,
        text: &str,
        replied_to: &str,
    ) -> Result<(), ChatError> {
        let _ = replied_to;
        self.send_message(channel_id, text).await
    }

    /// Show a typing indicator in a channel.
    async fn send_typing(&self, channel_id: &str) -> Result<(), ChatError>;

    /// Set the bot's own display nickname. An empty string resets it.
    async fn set_nickname(&self, name: &str) -> Result<(), ChatError>;
}

/// A no-op chat client for tests that discards all actions.
#[derive(Debug, Clone, Default)]
pub struct NoopChat;

#[async_trait]
impl ChatClient for NoopChat {
    async fn send_message(&self, _channel_id: &str, _text: &str) -> Result<(), ChatError> {
        Ok(())
    }

    async fn send_typing(&self, _channel_id: &str) -> Result<(), ChatError> {
        Ok(())
    }

    async fn set_nickname(&self, _name: &str) -> Result<(), ChatError> {
        Ok(())
    }
}

/// A message captured by [`RecordingChat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Target channel.
    pub channel_id: String,
    /// Message text.
    pub text: String,
    /// Message id this was a reply to, if any.
    pub replied_to: Option<String>,
}

/// A chat client for tests that records every action.
#[derive(Debug, Default)]
pub struct RecordingChat {
    sent: std::sync::Mutex<Vec<SentMessage>>,
    nicknames: std::sync::Mutex<Vec<String>>,
}

impl RecordingChat {
    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().expect("lock poisoned").clone()
    }

    /// Nickname changes so far, in order.
    pub fn nicknames(&self) -> Vec<String> {
        self.nicknames.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl ChatClient for RecordingChat {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChatError> {
        self.sent.lock().expect("lock poisoned").push(SentMessage {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            replied_to: None,
        });
        Ok(())
    }

    async fn send_reply(
        &self,
        channel_id: &str,
        text: &str,
        replied_to: &str,
    ) -> Result<(), ChatError> {
        self.sent.lock().expect("lock poisoned").push(SentMessage {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            replied_to: Some(replied_to.to_string()),
        });
        Ok(())
    }

    async fn send_typing(&self, _channel_id: &str) -> Result<(), ChatError> {
        Ok(())
    }

    async fn set_nickname(&self, name: &str) -> Result<(), ChatError> {
        self.nicknames
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_chat() {
        let chat = NoopChat;

        chat.send_message("c1", "hello").await.unwrap();
        chat.send_reply("c1", "hello", "123").await.unwrap();
        chat.send_typing("c1").await.unwrap();
        chat.set_nickname("bot").await.unwrap();
    }

    #[tokio::test]
    async fn test_recording_chat_captures_order() {
        let chat = RecordingChat::default();

        chat.send_message("c1", "first").await.unwrap();
        chat.send_reply("c2", "second", "99").await.unwrap();
        chat.set_nickname("newnick").await.unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].text, "first");
        assert_eq!(sent[0].replied_to, None);
        assert_eq!(sent[1].channel_id, "c2");
        assert_eq!(sent[1].replied_to, Some("99".to_string()));
        assert_eq!(chat.nicknames(), vec!["newnick".to_string()]);
    }
}
