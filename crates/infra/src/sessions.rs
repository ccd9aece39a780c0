//! Token lifecycle on top of the store: refresh, revoke, authenticate.
//!
//! [`TokenService`] is pure; this module adds the persisted refresh-token
//! state (existence and revocation) that the pure layer knows nothing about.

use std::sync::Arc;

use chirpy_auth::{TokenClaims, TokenKind, TokenService, split_authorization};
use chirpy_core::{DomainError, DomainResult, UserId};

use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<DocumentStore>,
    tokens: Arc<TokenService>,
}

impl SessionManager {
    pub fn new(store: Arc<DocumentStore>, tokens: Arc<TokenService>) -> Self {
        Self { store, tokens }
    }

    /// Signature + expiry check only; the issuer is left to the caller.
    pub fn validate(&self, raw: &str) -> DomainResult<TokenClaims> {
        Ok(self.tokens.validate(raw)?)
    }

    /// Resolve an access token to the user it was issued for.
    pub fn authenticate(&self, raw: &str) -> DomainResult<UserId> {
        let claims = self.validate(raw)?;
        claims
            .expect_kind(TokenKind::Access)
            .map_err(|_| DomainError::authentication("invalid access token"))?;
        Ok(claims.user_id()?)
    }

    fn validate_refresh(&self, raw: &str) -> DomainResult<(String, TokenClaims)> {
        let claims = self.validate(raw)?;
        claims
            .expect_kind(TokenKind::Refresh)
            .map_err(|_| DomainError::authentication("invalid refresh token issuer"))?;
        let token = split_authorization(raw)?.to_string();
        Ok((token, claims))
    }

    /// Mint a new access token from a stored, unrevoked refresh token.
    pub fn refresh(&self, raw: &str) -> DomainResult<String> {
        let (token, claims) = self.validate_refresh(raw)?;
        let subject = claims.user_id()?;

        let record = self.store.read(|doc| doc.refresh_tokens.get(&token).cloned())?;
        match record {
            None => return Err(DomainError::authentication("invalid refresh token")),
            Some(r) if r.revoked => {
                tracing::warn!(user_id = %subject, "refresh attempted with revoked token");
                return Err(DomainError::authentication("refresh token revoked"));
            }
            Some(_) => {}
        }

        Ok(self.tokens.issue(TokenKind::Access, subject)?)
    }

    /// Permanently revoke a refresh token. Revoking twice is an error.
    pub fn revoke(&self, raw: &str) -> DomainResult<()> {
        let (token, claims) = self.validate_refresh(raw)?;

        self.store.update(|doc| {
            let record = doc
                .refresh_tokens
                .get_mut(&token)
                .ok_or_else(|| DomainError::authentication("invalid refresh token"))?;
            if record.revoked {
                return Err(DomainError::authentication("token has been revoked"));
            }
            record.revoked = true;
            Ok(())
        })?;

        tracing::info!(user_id = %claims.sub, "refresh token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    fn setup() -> (SessionManager, Arc<DocumentStore>, Arc<TokenService>) {
        let store = Arc::new(DocumentStore::in_memory());
        let tokens = Arc::new(TokenService::new(b"test-secret"));
        (SessionManager::new(store.clone(), tokens.clone()), store, tokens)
    }

    fn stored_refresh(store: &DocumentStore, tokens: &TokenService, user: u64) -> String {
        let token = tokens.issue(TokenKind::Refresh, UserId::new(user)).unwrap();
        store
            .update(|doc| -> DomainResult<()> {
                doc.record_refresh_token(&token, UserId::new(user), Utc::now());
                Ok(())
            })
            .unwrap();
        format!("Bearer {token}")
    }

    #[test]
    fn authenticate_accepts_access_and_rejects_refresh() {
        let (sessions, store, tokens) = setup();
        let access = tokens.issue(TokenKind::Access, UserId::new(3)).unwrap();
        assert_eq!(sessions.authenticate(&format!("Bearer {access}")), Ok(UserId::new(3)));

        let refresh = stored_refresh(&store, &tokens, 3);
        assert_eq!(
            sessions.authenticate(&refresh),
            Err(DomainError::authentication("invalid access token"))
        );
    }

    #[test]
    fn refresh_and_revoke_reject_access_tokens() {
        let (sessions, _store, tokens) = setup();
        let access = format!("Bearer {}", tokens.issue(TokenKind::Access, UserId::new(1)).unwrap());

        let expected = DomainError::authentication("invalid refresh token issuer");
        assert_eq!(sessions.refresh(&access).unwrap_err(), expected);
        assert_eq!(sessions.revoke(&access).unwrap_err(), expected);
    }

    #[test]
    fn refresh_requires_a_stored_record() {
        let (sessions, _store, tokens) = setup();
        let unknown = format!("Bearer {}", tokens.issue(TokenKind::Refresh, UserId::new(1)).unwrap());
        assert_eq!(
            sessions.refresh(&unknown),
            Err(DomainError::authentication("invalid refresh token"))
        );
        assert_eq!(
            sessions.revoke(&unknown),
            Err(DomainError::authentication("invalid refresh token"))
        );
    }

    #[test]
    fn refresh_mints_access_token_for_same_subject() {
        let (sessions, store, tokens) = setup();
        let refresh = stored_refresh(&store, &tokens, 7);

        let access = sessions.refresh(&refresh).unwrap();
        assert_eq!(sessions.authenticate(&format!("Bearer {access}")), Ok(UserId::new(7)));
    }

    #[test]
    fn revocation_is_permanent_and_detectable() {
        let (sessions, store, tokens) = setup();
        let refresh = stored_refresh(&store, &tokens, 1);

        sessions.revoke(&refresh).unwrap();

        assert_eq!(
            sessions.revoke(&refresh),
            Err(DomainError::authentication("token has been revoked"))
        );
        assert_eq!(
            sessions.refresh(&refresh),
            Err(DomainError::authentication("refresh token revoked"))
        );
        let token = refresh.trim_start_matches("Bearer ");
        assert!(store.load().unwrap().refresh_tokens[token].revoked);
    }

    #[test]
    fn expired_refresh_token_is_rejected_before_lookup() {
        let (sessions, store, _tokens) = setup();
        let short = TokenService::new(b"test-secret").with_refresh_ttl(Duration::seconds(1));
        let token = short
            .issue_at(TokenKind::Refresh, UserId::new(1), Utc::now() - Duration::minutes(1))
            .unwrap();
        store
            .update(|doc| -> DomainResult<()> {
                doc.record_refresh_token(&token, UserId::new(1), Utc::now());
                Ok(())
            })
            .unwrap();

        let err = sessions.refresh(&format!("Bearer {token}")).unwrap_err();
        assert_eq!(err, DomainError::authentication("token has expired"));
    }

    #[test]
    fn malformed_header_is_invalid_token() {
        let (sessions, _store, _tokens) = setup();
        assert_eq!(
            sessions.authenticate("not-a-header"),
            Err(DomainError::authentication("invalid token"))
        );
    }
}
