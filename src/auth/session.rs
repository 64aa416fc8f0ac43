use axum::extract::FromRef;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::debug;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Account role. Admin does not implicitly hold writer capabilities; every
/// guarded operation names the roles it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum Role {
    Admin,
    Writer,
}

/// Decoded session payload. Exists only inside the signed cookie value;
/// there is no server-side session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub role: Role,
}

/// Signing key plus cookie transport settings, derived from `AppConfig`.
/// The secret is read-only after process start.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
    pub cookie_name: String,
    pub max_age_seconds: i64,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.session;
        Self {
            secret: cfg.secret.as_bytes().to_vec(),
            cookie_name: cfg.cookie_name.clone(),
            max_age_seconds: cfg.max_age_days * 24 * 60 * 60,
        }
    }
}

impl SessionKeys {
    pub fn new(secret: &[u8], cookie_name: &str, max_age_days: i64) -> Self {
        Self {
            secret: secret.to_vec(),
            cookie_name: cookie_name.to_string(),
            max_age_seconds: max_age_days * 24 * 60 * 60,
        }
    }

    /// HMAC-SHA256 over `data`. Deterministic for a given secret.
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    /// Recompute-and-compare in constant time. A length mismatch is just
    /// `false`; nothing escapes as an error.
    fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(data);
        mac.verify_slice(signature).is_ok()
    }

    /// Encode and sign a session into a self-contained token:
    /// `base64url(json(payload)) + "." + base64url(hmac(encoded))`.
    pub fn create(&self, session: &Session) -> anyhow::Result<String> {
        let payload = serde_json::to_vec(session)?;
        let encoded = Base64UrlUnpadded::encode_string(&payload);
        let signature = Base64UrlUnpadded::encode_string(&self.sign(encoded.as_bytes()));
        Ok(format!("{encoded}.{signature}"))
    }

    /// Decode a token. Anything short of a verified signature over a
    /// well-formed payload comes back as `None`; a bad token is
    /// indistinguishable from no token at all.
    pub fn parse(&self, token: &str) -> Option<Session> {
        let (encoded, signature) = token.split_once('.')?;
        if encoded.is_empty() || signature.is_empty() || signature.contains('.') {
            return None;
        }
        let signature = Base64UrlUnpadded::decode_vec(signature).ok()?;
        if !self.verify(encoded.as_bytes(), &signature) {
            return None;
        }
        let payload = Base64UrlUnpadded::decode_vec(encoded).ok()?;
        let session: Session = serde_json::from_slice(&payload).ok()?;
        debug!(user_id = session.user_id, "session token verified");
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"test-session-secret", "session", 7)
    }

    fn writer_session() -> Session {
        Session {
            user_id: 42,
            username: "writer1".into(),
            role: Role::Writer,
        }
    }

    #[test]
    fn round_trip_preserves_payload() {
        let keys = keys();
        for session in [
            writer_session(),
            Session {
                user_id: 1,
                username: "admin".into(),
                role: Role::Admin,
            },
        ] {
            let token = keys.create(&session).expect("create token");
            assert_eq!(keys.parse(&token), Some(session));
        }
    }

    #[test]
    fn tokens_are_deterministic() {
        let keys = keys();
        let a = keys.create(&writer_session()).unwrap();
        let b = keys.create(&writer_session()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_handles_unicode_usernames() {
        let keys = keys();
        let session = Session {
            user_id: 7,
            username: "рыжая-лиса".into(),
            role: Role::Writer,
        };
        let token = keys.create(&session).unwrap();
        assert_eq!(keys.parse(&token), Some(session));
    }

    #[test]
    fn any_single_character_change_invalidates_the_token() {
        let keys = keys();
        let token = keys.create(&writer_session()).unwrap();
        assert!(keys.parse(&token).is_some());

        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert_eq!(keys.parse(&tampered), None, "mutation at byte {i} accepted");
        }
    }

    #[test]
    fn rejects_token_signed_with_a_different_secret() {
        let token = SessionKeys::new(b"other-secret", "session", 7)
            .create(&writer_session())
            .unwrap();
        assert_eq!(keys().parse(&token), None);
    }

    #[test]
    fn rejects_signature_taken_from_another_payload() {
        let keys = keys();
        let token_a = keys.create(&writer_session()).unwrap();
        let token_b = keys
            .create(&Session {
                user_id: 1,
                username: "admin".into(),
                role: Role::Admin,
            })
            .unwrap();
        let (payload_a, _) = token_a.split_once('.').unwrap();
        let (_, sig_b) = token_b.split_once('.').unwrap();
        assert_eq!(keys.parse(&format!("{payload_a}.{sig_b}")), None);
    }

    #[test]
    fn rejects_malformed_tokens() {
        let keys = keys();
        let valid = keys.create(&writer_session()).unwrap();
        let (payload, signature) = valid.split_once('.').unwrap();

        for token in [
            "",
            "no-separator",
            ".",
            &format!(".{signature}"),
            &format!("{payload}."),
            &format!("{payload}.{signature}.extra"),
            "!!not-base64!!.!!also-not!!",
        ] {
            assert_eq!(keys.parse(token), None, "token {token:?} accepted");
        }
    }

    #[test]
    fn rejects_well_signed_garbage_payload() {
        // A correctly signed segment that does not decode into a session
        // must still come back as None.
        let keys = keys();
        let encoded = Base64UrlUnpadded::encode_string(b"{\"not\":\"a session\"}");
        let signature = Base64UrlUnpadded::encode_string(&keys.sign(encoded.as_bytes()));
        assert_eq!(keys.parse(&format!("{encoded}.{signature}")), None);
    }

    #[test]
    fn token_payload_is_camel_cased_json() {
        let keys = keys();
        let token = keys.create(&writer_session()).unwrap();
        let (encoded, _) = token.split_once('.').unwrap();
        let raw = Base64UrlUnpadded::decode_vec(encoded).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["userId"], 42);
        assert_eq!(value["username"], "writer1");
        assert_eq!(value["role"], "writer");
    }
}
