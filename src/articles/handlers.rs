use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    articles::{
        dto::{
            ArticleListQuery, ArticleResponse, ClickResponse, CreateArticleRequest,
            CreatedArticleResponse, StatusUpdateRequest, StatusUpdatedResponse,
        },
        repo, services,
    },
    auth::extractors::OptionalSession,
    error::ApiError,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles))
        .route("/articles/:slug", get(get_article))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", post(create_article))
        .route("/articles/:id/status", patch(update_status))
        .route("/articles/:id/click", post(record_click))
}

#[instrument(skip(state))]
pub async fn list_articles(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<ArticleListQuery>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let filter = services::visible_filter(session.as_ref(), query)?;
    let rows = repo::list(&state.db, &filter).await?;
    Ok(Json(rows.into_iter().map(ArticleResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_article(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let record = repo::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Article not found".into()))?;

    // Hidden and absent are the same thing to an anonymous caller.
    if !services::can_view(session.as_ref(), record.status) {
        return Err(ApiError::NotFound("Article not found".into()));
    }

    Ok(Json(ArticleResponse::from(record)))
}

#[instrument(skip(state, payload))]
pub async fn create_article(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<CreatedArticleResponse>), ApiError> {
    let id = services::submit(&state.db, session.as_ref(), payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedArticleResponse {
            id,
            message: "Article created successfully. Waiting for admin approval.".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Path(id): Path<i32>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<StatusUpdatedResponse>, ApiError> {
    let status = services::decide(&state.db, session.as_ref(), id, payload.status).await?;
    Ok(Json(StatusUpdatedResponse {
        message: format!("Article {} successfully", status.as_str()),
    }))
}

#[instrument(skip(state))]
pub async fn record_click(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Json<ClickResponse> {
    services::record_click(&state.db, id).await;
    Json(ClickResponse { success: true })
}
