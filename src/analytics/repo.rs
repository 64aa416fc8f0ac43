use sqlx::PgPool;
use time::OffsetDateTime;

use crate::analytics::repo_types::{AnalyticsEvent, NewEvent};

pub async fn insert(db: &PgPool, event: &NewEvent) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_analytics (session_id, event, article_id, category_id, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&event.session_id)
    .bind(&event.event)
    .bind(event.article_id)
    .bind(event.category_id)
    .bind(&event.metadata)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn since(db: &PgPool, start: OffsetDateTime) -> anyhow::Result<Vec<AnalyticsEvent>> {
    let rows = sqlx::query_as::<_, AnalyticsEvent>(
        r#"
        SELECT id, session_id, article_id, category_id, event, metadata, created_at
        FROM user_analytics
        WHERE created_at > $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(start)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
