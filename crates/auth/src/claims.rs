use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Role;

/// Registered JWT claims the API relies on.
///
/// `iat`/`exp` are seconds since the Unix epoch, as on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user or client id).
    pub sub: String,

    /// Carried through for downstream use. Not enforced: any valid token
    /// may call every catalog endpoint.
    #[serde(default)]
    pub roles: Vec<Role>,

    pub iat: i64,

    pub exp: i64,
}

impl JwtClaims {
    pub fn new(sub: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: sub.into(),
            roles: Vec::new(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token subject is empty")]
    MissingSubject,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature does not verify")]
    BadSignature,
}

/// Check the claim window against `now`.
///
/// Signature verification happens before this, in [`crate::JwtValidator`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.sub.trim().is_empty() {
        return Err(TokenValidationError::MissingSubject);
    }
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }

    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn window(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims::new("brewer", now - Duration::minutes(1), now + Duration::minutes(10))
    }

    #[test]
    fn accepts_current_window() {
        let now = Utc::now();
        assert_eq!(validate_claims(&window(now), now), Ok(()));
    }

    #[test]
    fn rejects_expired() {
        let now = Utc::now();
        let later = now + Duration::minutes(11);
        assert_eq!(validate_claims(&window(now), later), Err(TokenValidationError::Expired));
    }

    #[test]
    fn rejects_future_issue() {
        let now = Utc::now();
        let earlier = now - Duration::minutes(5);
        assert_eq!(
            validate_claims(&window(now), earlier),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window_and_blank_subject() {
        let now = Utc::now();
        let inverted = JwtClaims::new("brewer", now, now);
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );

        let mut blank = window(now);
        blank.sub = "  ".into();
        assert_eq!(validate_claims(&blank, now), Err(TokenValidationError::MissingSubject));
    }

    #[test]
    fn roles_default_to_empty_on_the_wire() {
        let claims: JwtClaims =
            serde_json::from_str(r#"{"sub":"brewer","iat":1,"exp":2}"#).unwrap();
        assert!(claims.roles.is_empty());
    }
}
