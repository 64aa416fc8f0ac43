use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// One tracked usage event. `metadata` is an opaque JSON blob stored and
/// returned verbatim; nothing here interprets it.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub id: i32,
    pub session_id: String,
    pub article_id: Option<i32>,
    pub category_id: Option<i32>,
    pub event: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
}

/// Event as submitted by the tracking endpoint.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub session_id: String,
    pub event: String,
    pub article_id: Option<i32>,
    pub category_id: Option<i32>,
    pub metadata: Option<serde_json::Value>,
}
