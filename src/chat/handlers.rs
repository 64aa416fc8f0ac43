use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    articles::{
        self,
        dto::ArticleResponse,
        repo_types::{ArticleFilter, ArticleStatus},
    },
    chat::{
        dto::{ChatRequest, ChatResponse, ConversationHistory},
        repo,
        repo_types::ChatRole,
        services::CompletionMessage,
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/chat/message", post(send_message))
        .route("/chat/:session_id/history", get(history))
}

#[instrument(skip(state, payload))]
pub async fn send_message(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if payload.session_id.trim().is_empty() || payload.message.trim().is_empty() {
        return Err(ApiError::Validation(
            "sessionId and message are required".into(),
        ));
    }

    let conversation = repo::find_or_create(&state.db, &payload.session_id).await?;
    let user_message =
        repo::append_message(&state.db, conversation.id, ChatRole::User, &payload.message).await?;

    // Replay the whole stored history so the model keeps context.
    let history = repo::history_asc(&state.db, conversation.id).await?;
    let prompt: Vec<CompletionMessage> = history.iter().map(CompletionMessage::from).collect();
    let reply = state.llm.complete(&prompt).await?;

    repo::append_message(&state.db, conversation.id, ChatRole::Assistant, &reply).await?;

    let suggested: Vec<ArticleResponse> = articles::repo::list(
        &state.db,
        &ArticleFilter {
            status: Some(ArticleStatus::Approved),
            ..Default::default()
        },
    )
    .await?
    .into_iter()
    .take(3)
    .map(ArticleResponse::from)
    .collect();

    Ok(Json(ChatResponse {
        conversation_id: conversation.id,
        message_id: user_message.id,
        response: reply,
        suggested_articles: suggested,
    }))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationHistory>, ApiError> {
    let conversation = repo::find_by_session(&state.db, &session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Conversation not found".into()))?;
    let messages = repo::history_desc(&state.db, conversation.id).await?;
    Ok(Json(ConversationHistory {
        conversation,
        messages,
    }))
}
