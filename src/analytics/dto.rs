use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub session_id: String,
    pub event: String,
    #[serde(default)]
    pub article_id: Option<i32>,
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub days: Option<i64>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopArticle {
    pub id: i32,
    pub title: String,
    pub views: usize,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEngagement {
    pub total_chats: usize,
    pub average_messages_per_session: f64,
}

/// Counting summary for the admin dashboard. Keys of `event_breakdown`
/// are sorted so the payload is stable.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub total_sessions: usize,
    pub total_events: usize,
    pub top_articles: Vec<TopArticle>,
    pub event_breakdown: BTreeMap<String, usize>,
    pub chat_engagement: ChatEngagement,
}
