use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use time::{Duration, OffsetDateTime};
use tracing::instrument;

use crate::{
    analytics::{
        dto::{DashboardQuery, DashboardResponse, TrackRequest, TrackResponse},
        repo,
        repo_types::NewEvent,
        services,
    },
    articles,
    auth::extractors::OptionalSession,
    auth::policy::{authorize, Capability},
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/track", post(track))
        .route("/analytics/dashboard", get(dashboard))
}

#[instrument(skip(state, payload))]
pub async fn track(
    State(state): State<AppState>,
    Json(payload): Json<TrackRequest>,
) -> Result<(StatusCode, Json<TrackResponse>), ApiError> {
    if payload.session_id.trim().is_empty() || payload.event.trim().is_empty() {
        return Err(ApiError::Validation(
            "sessionId and event are required".into(),
        ));
    }

    repo::insert(
        &state.db,
        &NewEvent {
            session_id: payload.session_id,
            event: payload.event,
            article_id: payload.article_id,
            category_id: payload.category_id,
            metadata: payload.metadata,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TrackResponse { success: true })))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    OptionalSession(session): OptionalSession,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardResponse>, ApiError> {
    authorize(session.as_ref(), Capability::Admin)?;

    let days = query.days.unwrap_or(30).clamp(1, 365);
    let start = OffsetDateTime::now_utc() - Duration::days(days);

    let events = repo::since(&state.db, start).await?;
    let titles = articles::repo::titles_by_id(&state.db).await?;
    Ok(Json(services::summarize(&events, &titles)))
}
