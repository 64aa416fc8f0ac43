use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::session::{Session, SessionKeys};
use crate::error::ApiError;
use crate::state::AppState;

/// Pull a named cookie value out of a `Cookie` header.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').map(str::trim).find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

fn session_from_parts(parts: &Parts, keys: &SessionKeys) -> Option<Session> {
    let header = parts
        .headers
        .get(axum::http::header::COOKIE)?
        .to_str()
        .ok()?;
    let token = cookie_value(header, &keys.cookie_name)?;
    keys.parse(token)
}

/// Extracts the verified session, rejecting with 401 when the cookie is
/// missing, malformed, or carries a bad signature.
#[derive(Debug)]
pub struct AuthSession(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        match session_from_parts(parts, &keys) {
            Some(session) => Ok(AuthSession(session)),
            None => {
                warn!("missing or invalid session cookie");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

/// Never rejects. A tampered or undecodable cookie degrades to anonymous,
/// not to an error and never to an elevated role.
pub struct OptionalSession(pub Option<Session>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        Ok(OptionalSession(session_from_parts(parts, &keys)))
    }
}
