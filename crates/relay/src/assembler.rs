//! Completion assembly.
//!
//! Turns a user's stored conversation into the ordered message list the
//! completion API expects, sends it, and records the answer back into the
//! store before anything is returned to the caller.

use std::sync::Arc;

use bot_core::UsageStats;
use completion::{ChatMessage, CompletionClient};
use database::{conversation, user, Database, DatabaseError};
use tracing::{debug, warn};

use crate::error::RelayError;
use crate::profile::Profile;

/// Builds prompts from stored history and runs completion requests.
#[derive(Clone)]
pub struct Assembler {
    db: Database,
    client: CompletionClient,
    stats: Arc<UsageStats>,
}

impl Assembler {
    /// Create a new assembler.
    pub fn new(db: Database, client: CompletionClient, stats: Arc<UsageStats>) -> Self {
        Self { db, client, stats }
    }

    /// Build the ordered message list for a user under the given profile.
    ///
    /// Shape: one system message (profile context plus the user's
    /// nickname), then for each stored turn a user message, followed by an
    /// assistant message only when that turn has an answer. An in-flight
    /// turn therefore appears as a trailing user message with no assistant
    /// pair, which is exactly the "answer this" shape the API expects.
    ///
    /// Fails with NotFound if the user has never been upserted.
    pub async fn build_history(
        &self,
        user_id: &str,
        profile: &Profile,
    ) -> Result<Vec<ChatMessage>, RelayError> {
        let user = user::get_user(self.db.pool(), user_id).await?;
        let turns = conversation::list_turns(self.db.pool(), user_id).await?;

        let mut messages = Vec::with_capacity(turns.len() * 2 + 1);
        messages.push(ChatMessage::system(format!(
            "{}\nYou are talking to {}.",
            profile.context, user.nick
        )));

        for turn in &turns {
            messages.push(ChatMessage::user(&turn.question));
            if turn.is_answered() {
                messages.push(ChatMessage::assistant(&turn.answer));
            }
        }

        debug!(user_id, messages = messages.len(), "assembled history");
        Ok(messages)
    }

    /// Run a completion for the user's pending turn and return the answer.
    ///
    /// The answer is persisted against `turn_id` and the token usage
    /// counted before the text is returned. A NotFound from the persist
    /// step means the turn was cleared by a session reset in the meantime;
    /// the answer is still returned, since the reply remains valid for the
    /// user.
    pub async fn complete(
        &self,
        user_id: &str,
        turn_id: &str,
        profile: &Profile,
    ) -> Result<String, RelayError> {
        let messages = self.build_history(user_id, profile).await?;

        let completion = self.client.chat(messages).await?;

        match conversation::record_answer(self.db.pool(), turn_id, &completion.text).await {
            Ok(()) => {}
            Err(DatabaseError::NotFound { .. }) => {
                warn!(turn_id, "turn vanished before its answer was recorded");
            }
            Err(e) => return Err(e.into()),
        }

        self.stats.tokens_used(u64::from(completion.total_tokens));

        Ok(completion.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::time::Duration;

    use completion::CompletionConfig;

    const COMPLETION_BODY: &str = r#"{"choices": [{"message": {"role": "assistant", "content": "Lima."}, "finish_reason": "stop"}], "usage": {"prompt_tokens": 10, "completion_tokens": 2, "total_tokens": 12}}"#;

    fn test_profile() -> Profile {
        Profile {
            name: "tutor".to_string(),
            regex: "(?i)^hey tutor".to_string(),
            context: "You are a patient tutor.".to_string(),
            question: "\nQ: ".to_string(),
            answer: "\nA: ".to_string(),
        }
    }

    async fn assembler_with_url(api_url: &str) -> Assembler {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let client = CompletionClient::new(
            CompletionConfig::builder()
                .api_key("test-key")
                .api_url(api_url)
                .build(),
        )
        .unwrap();

        Assembler::new(db, client, Arc::new(UsageStats::new()))
    }

    /// Assembler whose completion endpoint points nowhere; history tests
    /// never touch the network.
    async fn test_assembler() -> Assembler {
        assembler_with_url("http://127.0.0.1:9").await
    }

    /// True once `request` holds the full headers plus content-length body.
    fn request_complete(request: &[u8]) -> bool {
        let Some(split) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&request[..split]);
        let body_len = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        request.len() >= split + 4 + body_len
    }

    /// Serve one request with a canned completion response, returning the
    /// base URL to point the client at.
    fn spawn_completion_server(body: &'static str) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            stream
                .set_read_timeout(Some(Duration::from_secs(1)))
                .ok();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while let Ok(n) = stream.read(&mut buf) {
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_build_history_unknown_user() {
        let assembler = test_assembler().await;

        let result = assembler.build_history("ghost", &test_profile()).await;
        assert!(matches!(
            result,
            Err(RelayError::Database(DatabaseError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_build_history_shape() {
        let assembler = test_assembler().await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();
        conversation::record_answer(pool, "100", "a1").await.unwrap();
        // Second turn is still in flight (no answer yet)
        conversation::append_turn(pool, "200", "u1", "q2", "c1")
            .await
            .unwrap();

        let messages = assembler
            .build_history("u1", &test_profile())
            .await
            .unwrap();

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("You are a patient tutor."));
        assert!(messages[0].content.contains("alice"));
        assert_eq!(messages[1], ChatMessage::user("q1"));
        assert_eq!(messages[2], ChatMessage::assistant("a1"));
        // No trailing empty assistant entry
        assert_eq!(messages[3], ChatMessage::user("q2"));
    }

    #[tokio::test]
    async fn test_build_history_after_clear() {
        let assembler = test_assembler().await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();
        conversation::clear_turns(pool, "u1").await.unwrap();

        let messages = assembler
            .build_history("u1", &test_profile())
            .await
            .unwrap();

        // System entry is still synthesized for an empty history
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "system");
    }

    #[tokio::test]
    async fn test_build_history_tracks_profile_switch() {
        let assembler = test_assembler().await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();

        let mut other = test_profile();
        other.name = "chef".to_string();
        other.context = "You are a grumpy chef.".to_string();

        let before = assembler
            .build_history("u1", &test_profile())
            .await
            .unwrap();
        let after = assembler.build_history("u1", &other).await.unwrap();

        assert!(before[0].content.contains("patient tutor"));
        assert!(after[0].content.contains("grumpy chef"));
        // Persisted turns are unaffected by the switch
        assert_eq!(before[1], after[1]);
    }

    #[tokio::test]
    async fn test_complete_propagates_api_failure() {
        let assembler = test_assembler().await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();

        let result = assembler.complete("u1", "100", &test_profile()).await;
        assert!(matches!(result, Err(RelayError::Completion(_))));

        // The failed call must not have recorded an answer
        let turns = conversation::list_turns(pool, "u1").await.unwrap();
        assert!(!turns[0].is_answered());
    }

    #[tokio::test]
    async fn test_complete_persists_answer_before_returning() {
        let url = spawn_completion_server(COMPLETION_BODY);
        let assembler = assembler_with_url(&url).await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();

        let text = assembler
            .complete("u1", "100", &test_profile())
            .await
            .unwrap();

        assert_eq!(text, "Lima.");
        let turns = conversation::list_turns(pool, "u1").await.unwrap();
        assert_eq!(turns[0].answer, "Lima.");
        assert_eq!(assembler.stats.total_tokens(), 12);
    }

    #[tokio::test]
    async fn test_complete_tolerates_turn_cleared_mid_flight() {
        let url = spawn_completion_server(COMPLETION_BODY);
        let assembler = assembler_with_url(&url).await;
        let pool = assembler.db.pool();

        user::upsert_user(pool, "u1", "alice").await.unwrap();
        conversation::append_turn(pool, "100", "u1", "q1", "c1")
            .await
            .unwrap();
        // Session reset clears the turn while the request is in flight
        conversation::clear_turns(pool, "u1").await.unwrap();

        let text = assembler
            .complete("u1", "100", &test_profile())
            .await
            .unwrap();

        // The answer still reaches the user, and nothing is re-created
        assert_eq!(text, "Lima.");
        let turns = conversation::list_turns(pool, "u1").await.unwrap();
        assert!(turns.is_empty());
        assert_eq!(assembler.stats.total_tokens(), 12);
    }
}
