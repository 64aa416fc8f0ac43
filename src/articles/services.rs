use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::articles::dto::{ArticleListQuery, CreateArticleRequest};
use crate::articles::repo;
use crate::articles::repo_types::{ArticleFilter, ArticleStatus, NewArticle};
use crate::auth::policy::{authorize, Capability};
use crate::auth::session::Session;
use crate::error::ApiError;

/// The two ways an admin can close out a pending article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn as_status(self) -> ArticleStatus {
        match self {
            Decision::Approved => ArticleStatus::Approved,
            Decision::Rejected => ArticleStatus::Rejected,
        }
    }
}

pub(crate) fn is_valid_slug(slug: &str) -> bool {
    lazy_static! {
        static ref SLUG_RE: Regex = Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap();
    }
    SLUG_RE.is_match(slug)
}

fn required(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(format!("{field} is required"))),
    }
}

pub(crate) fn validate_draft(req: CreateArticleRequest) -> Result<ValidDraft, ApiError> {
    let title = required(req.title, "title")?;
    let slug = required(req.slug, "slug")?;
    if !is_valid_slug(&slug) {
        return Err(ApiError::Validation(
            "slug must be lowercase letters, digits and hyphens".into(),
        ));
    }
    let excerpt = required(req.excerpt, "excerpt")?;
    let content = required(req.content, "content")?;
    let cover_image = required(req.cover_image, "coverImage")?;
    let category_id = req
        .category_id
        .ok_or_else(|| ApiError::Validation("categoryId is required".into()))?;
    let author_id = req
        .author_id
        .ok_or_else(|| ApiError::Validation("authorId is required".into()))?;
    let read_time = req.read_time.unwrap_or(5);
    if read_time <= 0 {
        return Err(ApiError::Validation("readTime must be positive".into()));
    }
    Ok(ValidDraft {
        title,
        slug,
        excerpt,
        content,
        cover_image,
        category_id,
        author_id,
        read_time,
    })
}

/// A draft that passed field validation but has no owner yet.
#[derive(Debug)]
pub(crate) struct ValidDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: String,
    pub category_id: i32,
    pub author_id: i32,
    pub read_time: i32,
}

/// Create a new article in `pending` state, owned by the calling writer.
pub async fn submit(
    db: &PgPool,
    session: Option<&Session>,
    req: CreateArticleRequest,
) -> Result<i32, ApiError> {
    let writer = authorize(session, Capability::WriterOrAdmin)?;
    let draft = validate_draft(req)?;

    if repo::slug_exists(db, &draft.slug).await? {
        return Err(ApiError::Conflict(format!(
            "An article with slug '{}' already exists",
            draft.slug
        )));
    }

    let article = NewArticle {
        title: draft.title,
        slug: draft.slug,
        excerpt: draft.excerpt,
        content: draft.content,
        cover_image: draft.cover_image,
        category_id: draft.category_id,
        author_id: draft.author_id,
        writer_id: writer.user_id,
        read_time: draft.read_time,
    };

    // The unique index still backs up the pre-check under concurrency.
    let id = repo::insert(db, &article).await.map_err(|e| {
        let slug_taken = matches!(&e, sqlx::Error::Database(db_err) if db_err.is_unique_violation());
        if slug_taken {
            ApiError::Conflict(format!(
                "An article with slug '{}' already exists",
                article.slug
            ))
        } else {
            ApiError::from(e)
        }
    })?;

    info!(article_id = id, writer_id = writer.user_id, "article submitted for review");
    Ok(id)
}

pub(crate) fn ensure_pending(current: ArticleStatus) -> Result<(), ApiError> {
    if current == ArticleStatus::Pending {
        Ok(())
    } else {
        Err(ApiError::Conflict(format!(
            "Article has already been {}",
            current.as_str()
        )))
    }
}

/// Close out a pending article. Terminal states never transition again; a
/// second decision reports a conflict instead of overwriting.
pub async fn decide(
    db: &PgPool,
    session: Option<&Session>,
    article_id: i32,
    decision: Decision,
) -> Result<ArticleStatus, ApiError> {
    let admin = authorize(session, Capability::Admin)?;

    let current = repo::status_of(db, article_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article not found".into()))?;
    ensure_pending(current)?;

    let target = decision.as_status();
    // Guarded UPDATE: if another decision raced past the check above, the
    // write matches zero rows and this one loses.
    if !repo::set_status_if_pending(db, article_id, target).await? {
        return Err(ApiError::Conflict("Article has already been decided".into()));
    }

    info!(article_id, admin_id = admin.user_id, status = target.as_str(), "article decided");
    Ok(target)
}

/// Fire-and-forget click counter. Storage failures are logged and
/// swallowed; the caller's flow never fails on this.
pub async fn record_click(db: &PgPool, article_id: i32) {
    if let Err(e) = repo::increment_clicks(db, article_id).await {
        warn!(error = %e, article_id, "click increment failed");
    }
}

/// Visibility rule for listings: a sessionless caller is pinned to
/// approved articles no matter what the query asked for; an authenticated
/// caller may filter by any explicit status.
pub fn visible_filter(
    session: Option<&Session>,
    query: ArticleListQuery,
) -> Result<ArticleFilter, ApiError> {
    let status = match (session, query.status.as_deref()) {
        (None, _) => Some(ArticleStatus::Approved),
        (Some(_), None) => None,
        (Some(_), Some(raw)) => Some(
            ArticleStatus::parse(raw)
                .ok_or_else(|| ApiError::Validation("Invalid status filter".into()))?,
        ),
    };
    Ok(ArticleFilter {
        category: query.category,
        featured: query.featured,
        search: query.search,
        status,
        writer_id: query.writer_id,
    })
}

/// Visibility rule for a single article: non-approved articles do not
/// exist as far as anonymous callers are concerned.
pub fn can_view(session: Option<&Session>, status: ArticleStatus) -> bool {
    session.is_some() || status == ArticleStatus::Approved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Role;

    fn writer() -> Session {
        Session {
            user_id: 9,
            username: "writer1".into(),
            role: Role::Writer,
        }
    }

    fn full_request() -> CreateArticleRequest {
        CreateArticleRequest {
            title: Some("Cybersecurity Tips for Students".into()),
            slug: Some("cybersecurity-tips-students".into()),
            excerpt: Some("Essential practices.".into()),
            content: Some("With more of our lives moving online...".into()),
            cover_image: Some("https://example.com/cover.jpg".into()),
            category_id: Some(2),
            author_id: Some(1),
            read_time: Some(4),
        }
    }

    #[test]
    fn slug_shapes() {
        assert!(is_valid_slug("future-of-ai-in-classrooms"));
        assert!(is_valid_slug("a"));
        assert!(is_valid_slug("top-10-stem-careers-2026"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("-leading-hyphen"));
        assert!(!is_valid_slug("trailing-hyphen-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("Upper-Case"));
        assert!(!is_valid_slug("spaces not allowed"));
        assert!(!is_valid_slug("unicode-émoji"));
    }

    #[test]
    fn validate_accepts_a_complete_draft() {
        let draft = validate_draft(full_request()).unwrap();
        assert_eq!(draft.slug, "cybersecurity-tips-students");
        assert_eq!(draft.read_time, 4);
    }

    #[test]
    fn validate_rejects_each_missing_required_field() {
        let strips: [fn(&mut CreateArticleRequest); 7] = [
            |r| r.title = None,
            |r| r.slug = None,
            |r| r.excerpt = None,
            |r| r.content = None,
            |r| r.cover_image = None,
            |r| r.category_id = None,
            |r| r.author_id = None,
        ];
        for strip in strips {
            let mut req = full_request();
            strip(&mut req);
            assert!(matches!(
                validate_draft(req).unwrap_err(),
                ApiError::Validation(_)
            ));
        }
    }

    #[test]
    fn validate_rejects_blank_and_malformed_values() {
        let mut req = full_request();
        req.title = Some("   ".into());
        assert!(matches!(
            validate_draft(req).unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut req = full_request();
        req.slug = Some("Not A Slug".into());
        assert!(matches!(
            validate_draft(req).unwrap_err(),
            ApiError::Validation(_)
        ));

        let mut req = full_request();
        req.read_time = Some(0);
        assert!(matches!(
            validate_draft(req).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn read_time_defaults_to_five() {
        let mut req = full_request();
        req.read_time = None;
        assert_eq!(validate_draft(req).unwrap().read_time, 5);
    }

    #[test]
    fn only_pending_articles_can_be_decided() {
        assert!(ensure_pending(ArticleStatus::Pending).is_ok());
        for terminal in [ArticleStatus::Approved, ArticleStatus::Rejected] {
            assert!(matches!(
                ensure_pending(terminal).unwrap_err(),
                ApiError::Conflict(_)
            ));
        }
    }

    #[test]
    fn decision_maps_to_terminal_status() {
        assert_eq!(Decision::Approved.as_status(), ArticleStatus::Approved);
        assert_eq!(Decision::Rejected.as_status(), ArticleStatus::Rejected);
    }

    #[test]
    fn anonymous_listing_is_pinned_to_approved() {
        let filter = visible_filter(None, ArticleListQuery::default()).unwrap();
        assert_eq!(filter.status, Some(ArticleStatus::Approved));

        // Even an explicit request for pending articles stays approved.
        let query = ArticleListQuery {
            status: Some("pending".into()),
            ..Default::default()
        };
        let filter = visible_filter(None, query).unwrap();
        assert_eq!(filter.status, Some(ArticleStatus::Approved));
    }

    #[test]
    fn authenticated_listing_honors_the_requested_status() {
        let session = writer();
        let query = ArticleListQuery {
            status: Some("pending".into()),
            ..Default::default()
        };
        let filter = visible_filter(Some(&session), query).unwrap();
        assert_eq!(filter.status, Some(ArticleStatus::Pending));

        let filter = visible_filter(Some(&session), ArticleListQuery::default()).unwrap();
        assert_eq!(filter.status, None);
    }

    #[test]
    fn authenticated_listing_rejects_unknown_status() {
        let session = writer();
        let query = ArticleListQuery {
            status: Some("published".into()),
            ..Default::default()
        };
        assert!(matches!(
            visible_filter(Some(&session), query).unwrap_err(),
            ApiError::Validation(_)
        ));
    }

    #[test]
    fn other_filters_pass_through_untouched() {
        let query = ArticleListQuery {
            category: Some("tech-ai".into()),
            featured: Some(true),
            search: Some("AI".into()),
            writer_id: Some(9),
            ..Default::default()
        };
        let filter = visible_filter(None, query).unwrap();
        assert_eq!(filter.category.as_deref(), Some("tech-ai"));
        assert_eq!(filter.featured, Some(true));
        assert_eq!(filter.search.as_deref(), Some("AI"));
        assert_eq!(filter.writer_id, Some(9));
    }

    #[test]
    fn anonymous_callers_only_see_approved_articles() {
        assert!(can_view(None, ArticleStatus::Approved));
        assert!(!can_view(None, ArticleStatus::Pending));
        assert!(!can_view(None, ArticleStatus::Rejected));

        let session = writer();
        for status in [
            ArticleStatus::Pending,
            ArticleStatus::Approved,
            ArticleStatus::Rejected,
        ] {
            assert!(can_view(Some(&session), status));
        }
    }

    #[test]
    fn decision_deserializes_from_lowercase_json() {
        let decision: Decision = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(decision, Decision::Approved);
        assert!(serde_json::from_str::<Decision>("\"pending\"").is_err());
    }
}
