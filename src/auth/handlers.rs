use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, MessageResponse, PublicUser},
        extractors::AuthSession,
        password::verify_password,
        repo_types::User,
        session::{Session, SessionKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

fn session_cookie(keys: &SessionKeys, token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        keys.cookie_name, token, keys.max_age_seconds
    )
}

fn expired_cookie(keys: &SessionKeys) -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", keys.cookie_name)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Username and password are required".into(),
        ));
    }

    let user = match User::find_by_username(&state.db, username).await? {
        Some(u) => u,
        None => {
            warn!(username, "login with unknown username");
            return Err(ApiError::Unauthorized);
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = user.id, "login with invalid password");
        return Err(ApiError::Unauthorized);
    }

    let keys = SessionKeys::from_ref(&state);
    let session = Session {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    let token = keys.create(&session)?;

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, session_cookie(&keys, &token).parse().unwrap());

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((
        headers,
        Json(LoginResponse {
            user: PublicUser::from(user),
            message: "Login successful".into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> (HeaderMap, Json<MessageResponse>) {
    // The token is self-contained, so logging out is just telling the
    // client to drop the cookie.
    let keys = SessionKeys::from_ref(&state);
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, expired_cookie(&keys).parse().unwrap());
    (
        headers,
        Json(MessageResponse {
            message: "Logout successful".into(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, session.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(PublicUser::from(user)))
}
