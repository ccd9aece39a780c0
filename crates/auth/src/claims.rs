use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chirpy_core::{DomainError, UserId};

pub const ACCESS_ISSUER: &str = "chirpy-access";
pub const REFRESH_ISSUER: &str = "chirpy-refresh";

/// Default lifetime of an access token, in seconds.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3_600;
/// Default lifetime of a refresh token (6 days), in seconds.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 6 * 24 * 3_600;

/// The purpose a token was minted for, carried in the `iss` claim.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived credential that authorizes individual requests.
    Access,
    /// Long-lived, persisted, individually revocable credential used only to
    /// mint new access tokens.
    Refresh,
}

impl TokenKind {
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_ISSUER,
            TokenKind::Refresh => REFRESH_ISSUER,
        }
    }

    pub fn from_issuer(issuer: &str) -> Option<Self> {
        match issuer {
            ACCESS_ISSUER => Some(TokenKind::Access),
            REFRESH_ISSUER => Some(TokenKind::Refresh),
            _ => None,
        }
    }
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// JWT claims model.
///
/// Field names follow the registered JWT claim names so tokens interoperate
/// with standard tooling. Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer: identifies the token kind.
    pub iss: String,

    /// Subject: the user identifier rendered as a decimal string.
    pub sub: String,

    /// Issued-at timestamp.
    pub iat: i64,

    /// Expiration timestamp.
    pub exp: i64,

    /// Token id; keeps two tokens minted in the same second distinct.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub jti: String,
}

impl TokenClaims {
    pub fn new(kind: TokenKind, subject: UserId, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            iss: kind.issuer().to_string(),
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: String::new(),
        }
    }

    pub fn with_token_id(mut self, jti: impl Into<String>) -> Self {
        self.jti = jti.into();
        self
    }

    pub fn kind(&self) -> Option<TokenKind> {
        TokenKind::from_issuer(&self.iss)
    }

    /// Issuer cross-check: reject a token minted for a different purpose.
    pub fn expect_kind(&self, expected: TokenKind) -> Result<(), TokenError> {
        if self.kind() == Some(expected) {
            Ok(())
        } else {
            Err(TokenError::WrongIssuer { expected })
        }
    }

    /// Parse the subject back into a user identifier.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        self.sub.parse().map_err(|_| TokenError::InvalidSubject)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The authorization value was not `"<scheme> <token>"`.
    #[error("invalid token")]
    MalformedHeader,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,

    #[error("invalid {expected} token issuer")]
    WrongIssuer { expected: TokenKind },

    #[error("invalid token subject")]
    InvalidSubject,

    #[error("error while signing the token: {0}")]
    Signing(String),
}

impl From<TokenError> for DomainError {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Signing(msg) => DomainError::internal(msg),
            other => DomainError::authentication(other.to_string()),
        }
    }
}

/// Deterministically validate the token time window.
///
/// Signature verification happens before this in [`crate::TokenService`];
/// this only looks at `iat`/`exp` against the supplied clock.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if claims.exp <= claims.iat {
        return Err(TokenError::InvalidTimeWindow);
    }
    let now = now.timestamp();
    if now < claims.iat {
        return Err(TokenError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }
    Ok(())
}
