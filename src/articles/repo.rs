use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::articles::repo_types::{ArticleFilter, ArticleRecord, ArticleStatus, NewArticle};

const SELECT_ARTICLE: &str = r#"
SELECT a.id, a.title, a.slug, a.excerpt, a.content, a.cover_image,
       a.category_id, a.author_id, a.writer_id, a.is_featured, a.read_time,
       a.status, a.clicks, a.published_at, a.created_at,
       c.name AS category_name, c.slug AS category_slug, c.description AS category_description,
       au.name AS author_name, au.avatar AS author_avatar, au.role AS author_role, au.bio AS author_bio
FROM articles a
JOIN categories c ON c.id = a.category_id
JOIN authors au ON au.id = a.author_id
"#;

pub async fn category_id_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<i32>> {
    let id = sqlx::query_scalar::<_, i32>("SELECT id FROM categories WHERE slug = $1")
        .bind(slug)
        .fetch_optional(db)
        .await?;
    Ok(id)
}

/// Filtered listing, newest first. Filters combine with AND semantics; a
/// category slug that matches no category yields an empty list rather than
/// an unconstrained one.
pub async fn list(db: &PgPool, filter: &ArticleFilter) -> anyhow::Result<Vec<ArticleRecord>> {
    let category_id = match &filter.category {
        Some(slug) => match category_id_by_slug(db, slug).await? {
            Some(id) => Some(id),
            None => return Ok(Vec::new()),
        },
        None => None,
    };

    let mut query = QueryBuilder::<Postgres>::new(SELECT_ARTICLE);
    query.push(" WHERE 1 = 1");
    if let Some(id) = category_id {
        query.push(" AND a.category_id = ").push_bind(id);
    }
    if let Some(featured) = filter.featured {
        query.push(" AND a.is_featured = ").push_bind(featured);
    }
    if let Some(search) = &filter.search {
        query
            .push(" AND a.title ILIKE ")
            .push_bind(format!("%{search}%"));
    }
    if let Some(status) = filter.status {
        query.push(" AND a.status = ").push_bind(status);
    }
    if let Some(writer_id) = filter.writer_id {
        query.push(" AND a.writer_id = ").push_bind(writer_id);
    }
    query.push(" ORDER BY a.published_at DESC, a.id DESC");

    let rows = query
        .build_query_as::<ArticleRecord>()
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn find_by_slug(db: &PgPool, slug: &str) -> anyhow::Result<Option<ArticleRecord>> {
    let sql = format!("{SELECT_ARTICLE} WHERE a.slug = $1");
    let row = sqlx::query_as::<_, ArticleRecord>(&sql)
        .bind(slug)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

pub async fn slug_exists(db: &PgPool, slug: &str) -> anyhow::Result<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM articles WHERE slug = $1)")
            .bind(slug)
            .fetch_one(db)
            .await?;
    Ok(exists)
}

/// Insert a draft with status `pending`. Returns the new id; a slug
/// collision surfaces as the database's unique violation.
pub async fn insert(db: &PgPool, article: &NewArticle) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        r#"
        INSERT INTO articles
            (title, slug, excerpt, content, cover_image, category_id, author_id, writer_id, read_time, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending')
        RETURNING id
        "#,
    )
    .bind(&article.title)
    .bind(&article.slug)
    .bind(&article.excerpt)
    .bind(&article.content)
    .bind(&article.cover_image)
    .bind(article.category_id)
    .bind(article.author_id)
    .bind(article.writer_id)
    .bind(article.read_time)
    .fetch_one(db)
    .await
}

pub async fn status_of(db: &PgPool, id: i32) -> anyhow::Result<Option<ArticleStatus>> {
    let status =
        sqlx::query_scalar::<_, ArticleStatus>("SELECT status FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?;
    Ok(status)
}

/// Single-row status write, guarded so only a pending article can change.
/// Returns false when the row was already decided (or gone).
pub async fn set_status_if_pending(
    db: &PgPool,
    id: i32,
    status: ArticleStatus,
) -> anyhow::Result<bool> {
    let result = sqlx::query("UPDATE articles SET status = $1 WHERE id = $2 AND status = 'pending'")
        .bind(status)
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Atomic counter bump at the storage layer; never read-modify-write.
pub async fn increment_clicks(db: &PgPool, id: i32) -> anyhow::Result<()> {
    sqlx::query("UPDATE articles SET clicks = clicks + 1 WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn titles_by_id(db: &PgPool) -> anyhow::Result<HashMap<i32, String>> {
    let rows = sqlx::query_as::<_, (i32, String)>("SELECT id, title FROM articles")
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().collect())
}
