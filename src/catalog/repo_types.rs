use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Static reference entity; many articles point at one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

/// Static reference entity; the byline shown on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Author {
    pub id: i32,
    pub name: String,
    pub avatar: String,
    pub role: String,
    pub bio: Option<String>,
}
