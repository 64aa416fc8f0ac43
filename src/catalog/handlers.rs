use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::catalog::repo;
use crate::catalog::repo_types::{Author, Category};
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/authors", get(list_authors))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(repo::list_categories(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>, ApiError> {
    Ok(Json(repo::list_authors(&state.db).await?))
}
