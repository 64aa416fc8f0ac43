use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::repo_types::{ChatRole, ConversationMessage};
use crate::config::ChatConfig;

/// Message shape sent to the completion API.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionMessage {
    pub role: ChatRole,
    pub content: String,
}

impl From<&ConversationMessage> for CompletionMessage {
    fn from(m: &ConversationMessage) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

/// Seam to the external completion API. The model behind it is opaque; all
/// this service cares about is history in, assistant text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: &[CompletionMessage]) -> anyhow::Result<String>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_completion_tokens: u32,
}

impl OpenAiClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_completion_tokens: config.max_completion_tokens,
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    max_completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionChoiceMessage {
    content: Option<String>,
}

pub(crate) fn first_content(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_else(|| "I couldn't generate a response.".to_string())
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: &[CompletionMessage]) -> anyhow::Result<String> {
        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                messages,
                max_completion_tokens: self.max_completion_tokens,
            })
            .send()
            .await?
            .error_for_status()?
            .json::<CompletionResponse>()
            .await?;
        debug!(model = %self.model, turns = messages.len(), "completion received");
        Ok(first_content(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn completion_message_serializes_lowercase_roles() {
        let stored = ConversationMessage {
            id: 1,
            conversation_id: 2,
            role: ChatRole::Assistant,
            content: "Hello!".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let value = serde_json::to_value(CompletionMessage::from(&stored)).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "Hello!");
    }

    #[test]
    fn first_content_picks_the_first_choice() {
        let response: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "role": "assistant", "content": "first" } },
                { "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();
        assert_eq!(first_content(response), "first");
    }

    #[test]
    fn first_content_falls_back_on_empty_or_null_replies() {
        let empty: CompletionResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(first_content(empty), "I couldn't generate a response.");

        let null_content: CompletionResponse = serde_json::from_value(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        }))
        .unwrap();
        assert_eq!(first_content(null_content), "I couldn't generate a response.");
    }
}
