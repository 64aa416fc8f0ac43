use serde::{Deserialize, Serialize};

use crate::articles::dto::ArticleResponse;
use crate::chat::repo_types::{Conversation, ConversationMessage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub conversation_id: i32,
    pub message_id: i32,
    pub response: String,
    pub suggested_articles: Vec<ArticleResponse>,
}

/// Conversation plus its messages, newest message first.
#[derive(Debug, Serialize)]
pub struct ConversationHistory {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub messages: Vec<ConversationMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::repo_types::ChatRole;
    use time::OffsetDateTime;

    #[test]
    fn history_flattens_the_conversation() {
        let history = ConversationHistory {
            conversation: Conversation {
                id: 4,
                session_id: "anon-1".into(),
                title: "New Conversation".into(),
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            },
            messages: vec![ConversationMessage {
                id: 1,
                conversation_id: 4,
                role: ChatRole::User,
                content: "hi".into(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            }],
        };
        let value = serde_json::to_value(&history).unwrap();
        assert_eq!(value["id"], 4);
        assert_eq!(value["sessionId"], "anon-1");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
