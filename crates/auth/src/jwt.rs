//! Token decoding and signature verification.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::{JwtClaims, TokenValidationError, validate_claims};

/// Verifies a bearer token and returns its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError>;
}

/// Shared-secret HS256 validator.
///
/// `jsonwebtoken` checks the signature and claim presence; the time window is
/// checked by [`validate_claims`] against the caller's clock.
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenValidationError> {
        let data = decode::<JwtClaims>(token, &self.key, &self.validation).map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature => TokenValidationError::BadSignature,
            _ => TokenValidationError::Malformed(e.to_string()),
        })?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::Role;

    fn mint(secret: &str, claims: &JwtClaims) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn fresh(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims::new("brewer", now, now + Duration::minutes(10))
            .with_roles(vec![Role::new("SCOPE_beer")])
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let now = Utc::now();
        let token = mint("s3cret", &fresh(now));

        let claims = Hs256JwtValidator::new("s3cret").validate(&token, now).unwrap();
        assert_eq!(claims.sub, "brewer");
        assert_eq!(claims.roles, vec![Role::new("SCOPE_beer")]);
    }

    #[test]
    fn wrong_secret_is_bad_signature() {
        let now = Utc::now();
        let token = mint("s3cret", &fresh(now));

        let err = Hs256JwtValidator::new("other").validate(&token, now).unwrap_err();
        assert_eq!(err, TokenValidationError::BadSignature);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = Hs256JwtValidator::new("s3cret")
            .validate("not-a-jwt", Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected_after_signature_check() {
        let now = Utc::now();
        let token = mint("s3cret", &fresh(now));

        let err = Hs256JwtValidator::new("s3cret")
            .validate(&token, now + Duration::hours(1))
            .unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
    }
}
