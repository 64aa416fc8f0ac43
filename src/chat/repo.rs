use sqlx::PgPool;

use crate::chat::repo_types::{ChatRole, Conversation, ConversationMessage};

pub async fn find_by_session(
    db: &PgPool,
    session_id: &str,
) -> anyhow::Result<Option<Conversation>> {
    let row = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT id, session_id, title, created_at, updated_at
        FROM conversations
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Atomic find-or-create keyed on the unique session id; the upsert also
/// freshens `updated_at` on reuse.
pub async fn find_or_create(db: &PgPool, session_id: &str) -> anyhow::Result<Conversation> {
    let row = sqlx::query_as::<_, Conversation>(
        r#"
        INSERT INTO conversations (session_id)
        VALUES ($1)
        ON CONFLICT (session_id) DO UPDATE SET updated_at = now()
        RETURNING id, session_id, title, created_at, updated_at
        "#,
    )
    .bind(session_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn append_message(
    db: &PgPool,
    conversation_id: i32,
    role: ChatRole,
    content: &str,
) -> anyhow::Result<ConversationMessage> {
    let row = sqlx::query_as::<_, ConversationMessage>(
        r#"
        INSERT INTO conversation_messages (conversation_id, role, content)
        VALUES ($1, $2, $3)
        RETURNING id, conversation_id, role, content, created_at
        "#,
    )
    .bind(conversation_id)
    .bind(role)
    .bind(content)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Full history oldest-first, as replayed to the completion API.
pub async fn history_asc(
    db: &PgPool,
    conversation_id: i32,
) -> anyhow::Result<Vec<ConversationMessage>> {
    let rows = sqlx::query_as::<_, ConversationMessage>(
        r#"
        SELECT id, conversation_id, role, content, created_at
        FROM conversation_messages
        WHERE conversation_id = $1
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// History newest-first, as served to the client.
pub async fn history_desc(
    db: &PgPool,
    conversation_id: i32,
) -> anyhow::Result<Vec<ConversationMessage>> {
    let rows = sqlx::query_as::<_, ConversationMessage>(
        r#"
        SELECT id, conversation_id, role, content, created_at
        FROM conversation_messages
        WHERE conversation_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
