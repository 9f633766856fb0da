//! HTTP client for the chat completions endpoint.

use reqwest::Client;
use tracing::debug;

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::CompletionConfig;
use crate::error::CompletionError;

/// Result of a successful completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Answer text from the first choice.
    pub text: String,
    /// Total tokens consumed by the request, as reported by the API.
    pub total_tokens: u32,
}

/// Client for an OpenAI-style chat completions API.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder().build().map_err(|e| {
            CompletionError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Submit an ordered message list and return the answer plus usage.
    ///
    /// Single-shot: a non-success status or malformed body is returned as
    /// an error with no retry.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<Completion, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Prefer the structured error message when the body parses
            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(CompletionError::Api {
                    status: status.as_u16(),
                    message: api_error.error.message,
                });
            }

            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let text = extract_text(&completion)?.to_string();

        let total_tokens = completion.usage.map(|u| u.total_tokens).unwrap_or(0);

        debug!(total_tokens, "completion received");

        Ok(Completion { text, total_tokens })
    }
}

/// Pull the answer text out of a parsed response.
fn extract_text(completion: &ChatCompletionResponse) -> Result<&str, CompletionError> {
    let first = completion.choices.first().ok_or_else(|| {
        CompletionError::InvalidResponse("response contained no choices".to_string())
    })?;

    first
        .message
        .content
        .as_deref()
        .ok_or_else(|| CompletionError::InvalidResponse("first choice has no content".to_string()))
}
