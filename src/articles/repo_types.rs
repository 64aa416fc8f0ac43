use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// Moderation lifecycle of an article. `Pending` is the only state a
/// decision may leave; `Approved` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ArticleStatus {
    Pending,
    Approved,
    Rejected,
}

impl ArticleStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One row of the joined listing query: article columns plus its category
/// and author flattened under aliases.
#[derive(Debug, Clone, FromRow)]
pub struct ArticleRecord {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: String,
    pub category_id: i32,
    pub author_id: i32,
    pub writer_id: Option<i32>,
    pub is_featured: bool,
    pub read_time: i32,
    pub status: ArticleStatus,
    pub clicks: i32,
    pub published_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
    pub category_name: String,
    pub category_slug: String,
    pub category_description: Option<String>,
    pub author_name: String,
    pub author_avatar: String,
    pub author_role: String,
    pub author_bio: Option<String>,
}

/// Conjunctive filter over the article collection. An absent field places
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub status: Option<ArticleStatus>,
    pub writer_id: Option<i32>,
}

/// A validated draft ready to be inserted with status `pending`.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: String,
    pub category_id: i32,
    pub author_id: i32,
    pub writer_id: i32,
    pub read_time: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ArticleStatus::Pending,
            ArticleStatus::Approved,
            ArticleStatus::Rejected,
        ] {
            assert_eq!(ArticleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ArticleStatus::parse("published"), None);
        assert_eq!(ArticleStatus::parse(""), None);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ArticleStatus::Approved).unwrap(),
            serde_json::json!("approved")
        );
    }
}
