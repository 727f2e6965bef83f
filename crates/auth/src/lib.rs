//! `taproom-auth`: bearer-token authentication, decoupled from HTTP.
//!
//! The API crate owns header extraction; this crate only turns a raw token
//! into verified [`JwtClaims`].

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use roles::Role;
