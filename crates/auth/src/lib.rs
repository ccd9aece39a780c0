//! `chirpy-auth`: authentication primitives, decoupled from HTTP and storage.
//!
//! - [`TokenService`]: HS256 access/refresh tokens
//! - [`PasswordHasher`]: salted Argon2 credential verifier
//! - [`ensure_owner`]: ownership authorization

pub mod authorize;
pub mod claims;
pub mod password;
pub mod tokens;

pub use authorize::ensure_owner;
pub use claims::{
    ACCESS_ISSUER, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS, REFRESH_ISSUER, TokenClaims,
    TokenError, TokenKind, validate_claims,
};
pub use password::{PasswordError, PasswordHasher};
pub use tokens::{TokenService, split_authorization};
