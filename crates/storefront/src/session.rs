//! Explicit session context for authenticated backend calls.
//!
//! The backend authenticates with a bearer JWT. Rather than reading the token
//! from ambient storage, every API call takes a [`Session`] so callers stay
//! testable without a simulated storage medium. An authentication failure
//! (401/403) from any collaborator clears the session via [`Session::clear`].

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Claims we care about from the JWT payload.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Expiry as seconds since the Unix epoch.
    exp: Option<i64>,
}

/// A per-user session carrying the bearer token, if any.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecretString>,
}

impl Session {
    /// Create a session from a bearer token.
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
        }
    }

    /// Create a session with no credentials.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// Whether the session carries a token at all.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The `Authorization` header value, if authenticated.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }

    /// Drop the token, signing the user out locally.
    pub fn clear(&mut self) {
        self.token = None;
    }

    /// Whether the token has expired (or cannot be decoded).
    ///
    /// Decodes the JWT payload segment and compares the `exp` claim against
    /// the current time. A missing or malformed token counts as expired, so
    /// callers treat it the same as a 401 and re-authenticate.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let Some(token) = self.token.as_ref() else {
            return true;
        };
        let Some(exp) = decode_expiry(token.expose_secret()) else {
            return true;
        };
        exp < chrono::Utc::now().timestamp()
    }
}

/// Extract the `exp` claim from a JWT without verifying the signature.
///
/// Verification happens server-side; the client only needs expiry to avoid
/// sending requests that are guaranteed to 401.
fn decode_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    claims.exp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}");
        let payload = URL_SAFE_NO_PAD.encode(format!("{{\"exp\":{exp}}}").as_bytes());
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn anonymous_session_is_expired_and_has_no_bearer() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(session.is_expired());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let exp = chrono::Utc::now().timestamp() + 3600;
        let session = Session::authenticated(token_with_exp(exp));
        assert!(session.is_authenticated());
        assert!(!session.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let exp = chrono::Utc::now().timestamp() - 60;
        let session = Session::authenticated(token_with_exp(exp));
        assert!(session.is_expired());
    }

    #[test]
    fn malformed_token_counts_as_expired() {
        let session = Session::authenticated("not-a-jwt");
        assert!(session.is_expired());
    }

    #[test]
    fn missing_exp_claim_counts_as_expired() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let payload = URL_SAFE_NO_PAD.encode(b"{\"sub\":\"user-1\"}");
        let session = Session::authenticated(format!("{header}.{payload}.sig"));
        assert!(session.is_expired());
    }

    #[test]
    fn clear_drops_the_token() {
        let mut session = Session::authenticated(token_with_exp(0));
        session.clear();
        assert!(!session.is_authenticated());
        assert!(session.bearer().is_none());
    }

    #[test]
    fn bearer_formats_authorization_header() {
        let session = Session::authenticated("abc123");
        assert_eq!(session.bearer().expect("bearer"), "Bearer abc123");
    }
}
