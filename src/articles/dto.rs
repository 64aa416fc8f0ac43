use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::articles::repo_types::{ArticleRecord, ArticleStatus};
use crate::articles::services::Decision;
use crate::catalog::repo_types::{Author, Category};

/// Incoming draft. Everything is optional at the wire level so that a
/// missing field reports as a 400 validation error, not a decode failure.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateArticleRequest {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub category_id: Option<i32>,
    pub author_id: Option<i32>,
    pub read_time: Option<i32>,
}

/// Query string of `GET /articles`. `status` stays a raw string here; the
/// visibility rule decides what it may mean for this caller.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleListQuery {
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub writer_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Decision,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedArticleResponse {
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdatedResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ClickResponse {
    pub success: bool,
}

/// Article as served to clients, with its category and author attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleResponse {
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
    pub category: Category,
    pub author: Author,
}

impl From<ArticleRecord> for ArticleResponse {
    fn from(r: ArticleRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            slug: r.slug,
            excerpt: r.excerpt,
            content: r.content,
            cover_image: r.cover_image,
            category_id: r.category_id,
            author_id: r.author_id,
            writer_id: r.writer_id,
            is_featured: r.is_featured,
            read_time: r.read_time,
            status: r.status,
            clicks: r.clicks,
            published_at: r.published_at,
            created_at: r.created_at,
            category: Category {
                id: r.category_id,
                name: r.category_name,
                slug: r.category_slug,
                description: r.category_description,
            },
            author: Author {
                id: r.author_id,
                name: r.author_name,
                avatar: r.author_avatar,
                role: r.author_role,
                bio: r.author_bio,
            },
        }
    }
}
