use sqlx::PgPool;

use crate::catalog::repo_types::{Author, Category};

pub async fn list_categories(db: &PgPool) -> anyhow::Result<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        r#"
        SELECT id, name, slug, description
        FROM categories
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_authors(db: &PgPool) -> anyhow::Result<Vec<Author>> {
    let rows = sqlx::query_as::<_, Author>(
        r#"
        SELECT id, name, avatar, role, bio
        FROM authors
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
