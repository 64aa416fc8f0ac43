use crate::auth::session::{Role, Session};
use crate::error::ApiError;

/// Permission level a protected operation declares. There is no implicit
/// hierarchy: `Admin` does not grant `WriterOrAdmin` by inheritance, the
/// variant spells out the accepted roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authenticated,
    Admin,
    WriterOrAdmin,
}

/// Check a (possibly absent) session against a required capability.
///
/// No session at all denies with `Unauthorized`; a session with the wrong
/// role denies with `Forbidden`. On success the borrowed session is handed
/// back so callers can read the caller's identity.
pub fn authorize(session: Option<&Session>, capability: Capability) -> Result<&Session, ApiError> {
    let session = session.ok_or(ApiError::Unauthorized)?;
    let allowed = match capability {
        Capability::Authenticated => true,
        Capability::Admin => session.role == Role::Admin,
        Capability::WriterOrAdmin => matches!(session.role, Role::Writer | Role::Admin),
    };
    if allowed {
        Ok(session)
    } else {
        Err(ApiError::Forbidden)
    }
}
