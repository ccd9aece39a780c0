//! Account lifecycle: registration, login, profile update, promotion.
//!
//! Password hashing and verification run outside the store lock; only the
//! document mutation itself is serialized.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use chirpy_auth::{PasswordHasher, TokenKind, TokenService};
use chirpy_core::{DomainError, DomainResult, UserId};
use chirpy_users::{User, UserView, ensure_email_available, find_by_email, validate_credentials};

use crate::store::DocumentStore;

/// Successful login: identity plus a fresh access/refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "is_chirpy_red")]
    pub promoted: bool,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct AccountManager {
    store: Arc<DocumentStore>,
    tokens: Arc<TokenService>,
    hasher: PasswordHasher,
}

impl AccountManager {
    pub fn new(store: Arc<DocumentStore>, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            tokens,
            hasher: PasswordHasher::new(),
        }
    }

    pub fn register(&self, email: &str, password: &str) -> DomainResult<UserView> {
        validate_credentials(email, password)?;
        let digest = self.hasher.hash(password)?;

        let view = self.store.update(|doc| {
            ensure_email_available(&doc.users, email, None)?;
            let id = doc.next_user_id()?;
            let user = User::new(id, email, digest);
            let view = user.view();
            doc.insert_user(user);
            Ok::<_, DomainError>(view)
        })?;

        tracing::info!(user_id = %view.id, "user registered");
        Ok(view)
    }

    pub fn login(&self, email: &str, password: &str) -> DomainResult<LoginResult> {
        let user = self
            .store
            .read(|doc| find_by_email(&doc.users, email).cloned())?
            .ok_or_else(|| DomainError::authentication("no user with given email"))?;

        if !self.hasher.verify(password, &user.password)? {
            tracing::warn!(user_id = %user.id, "login rejected: invalid password");
            return Err(DomainError::authentication("invalid password"));
        }

        let now = Utc::now();
        let token = self.tokens.issue_at(TokenKind::Access, user.id, now)?;
        let refresh_token = self.tokens.issue_at(TokenKind::Refresh, user.id, now)?;

        // Verification ran outside the lock; the stored digest must still be
        // the one that was checked.
        let (current, superseded) = self.store.update(|doc| {
            let current = match doc.users.get(&user.id) {
                Some(u) if u.password == user.password => u.clone(),
                Some(_) => return Err(DomainError::authentication("invalid password")),
                None => return Err(DomainError::authentication("no user with given email")),
            };
            let superseded = doc.record_refresh_token(&refresh_token, current.id, now);
            Ok((current, superseded))
        })?;

        tracing::info!(user_id = %current.id, superseded, "user logged in");
        Ok(LoginResult {
            id: current.id,
            email: current.email,
            promoted: current.promoted,
            token,
            refresh_token,
        })
    }

    /// Replace email and password of `user_id`.
    ///
    /// The caller must already have authenticated as `user_id`.
    pub fn update(&self, user_id: UserId, email: &str, password: &str) -> DomainResult<UserView> {
        validate_credentials(email, password)?;
        let digest = self.hasher.hash(password)?;

        let view = self.store.update(|doc| {
            if !doc.users.contains_key(&user_id) {
                return Err(DomainError::NotFound);
            }
            ensure_email_available(&doc.users, email, Some(user_id))?;
            let user = doc.user_mut(user_id)?;
            user.email = email.to_string();
            user.password = digest;
            Ok(user.view())
        })?;

        tracing::info!(user_id = %user_id, "user updated");
        Ok(view)
    }

    /// Mark the account as upgraded. Idempotent.
    pub fn promote(&self, user_id: UserId) -> DomainResult<()> {
        self.store.update(|doc| {
            doc.user_mut(user_id)?.promote();
            Ok::<_, DomainError>(())
        })?;
        tracing::info!(user_id = %user_id, "user promoted");
        Ok(())
    }

    pub fn get(&self, user_id: UserId) -> DomainResult<UserView> {
        self.store
            .read(|doc| doc.users.get(&user_id).map(User::view))?
            .ok_or(DomainError::NotFound)
    }
}
