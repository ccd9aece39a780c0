//! HS256 token issuing and validation.
//!
//! The service is pure with respect to storage: it never records or looks up
//! tokens. Persisting refresh tokens and revoking them is the session layer's
//! job.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use chirpy_core::UserId;

use crate::claims::{
    DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS, TokenClaims, TokenError, TokenKind,
    validate_claims,
};

/// Split an `Authorization` value of the form `"<scheme> <token>"`.
///
/// Exactly two space-separated parts are accepted; the scheme itself is not
/// interpreted.
pub fn split_authorization(raw: &str) -> Result<&str, TokenError> {
    let mut parts = raw.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_scheme), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(TokenError::MalformedHeader),
    }
}

/// Issues and validates signed, time-bounded tokens.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
    counter: AtomicU64,
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            counter: AtomicU64::new(0),
        }
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Issue a signed token of `kind` for `subject`, valid from now.
    pub fn issue(&self, kind: TokenKind, subject: UserId) -> Result<String, TokenError> {
        self.issue_at(kind, subject, Utc::now())
    }

    pub fn issue_at(
        &self,
        kind: TokenKind,
        subject: UserId,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let jti = format!(
            "{:x}.{:x}",
            now.timestamp_nanos_opt().unwrap_or_default(),
            seq
        );
        let claims = TokenClaims::new(kind, subject, now, self.ttl(kind)).with_token_id(jti);

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a raw `"<scheme> <token>"` value against the current time.
    ///
    /// Checks the signature and the time window. It does NOT check the issuer:
    /// callers must use [`TokenClaims::expect_kind`] for the flow they serve.
    pub fn validate(&self, raw: &str) -> Result<TokenClaims, TokenError> {
        self.validate_at(raw, Utc::now())
    }

    pub fn validate_at(&self, raw: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let token = split_authorization(raw)?;
        self.decode_at(token, now)
    }

    /// Validate a bare token (no scheme prefix).
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_claims`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}
