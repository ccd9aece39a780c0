use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use chirpy_core::{DomainError, DomainResult, Entity, UserId};

/// A registered account as persisted in the document.
///
/// `password` holds the one-way digest, never the plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    /// Paid/upgraded account flag.
    #[serde(rename = "is_chirpy_red", default)]
    pub promoted: bool,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password: password_digest.into(),
            promoted: false,
        }
    }

    /// Idempotent: promoting an already promoted user changes nothing.
    pub fn promote(&mut self) {
        self.promoted = true;
    }

    pub fn view(&self) -> UserView {
        UserView::from(self)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Public projection of a user (no password digest).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    #[serde(rename = "is_chirpy_red")]
    pub promoted: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            promoted: user.promoted,
        }
    }
}

/// Exact, case-sensitive email lookup.
pub fn find_by_email<'a>(users: &'a BTreeMap<UserId, User>, email: &str) -> Option<&'a User> {
    users.values().find(|u| u.email == email)
}

/// Fail with `Conflict` if `email` belongs to a user other than `except`.
pub fn ensure_email_available(
    users: &BTreeMap<UserId, User>,
    email: &str,
    except: Option<UserId>,
) -> DomainResult<()> {
    match find_by_email(users, email) {
        Some(existing) if Some(existing.id) != except => Err(DomainError::conflict(
            "user already exist with given email",
        )),
        _ => Ok(()),
    }
}

/// Reject obviously unusable credentials before any hashing happens.
pub fn validate_credentials(email: &str, password: &str) -> DomainResult<()> {
    if email.trim().is_empty() {
        return Err(DomainError::validation("email must not be empty"));
    }
    if password.is_empty() {
        return Err(DomainError::validation("password must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> BTreeMap<UserId, User> {
        let mut map = BTreeMap::new();
        map.insert(UserId::new(1), User::new(UserId::new(1), "alice@example.com", "h1"));
        map.insert(UserId::new(2), User::new(UserId::new(2), "bob@example.com", "h2"));
        map
    }

    #[test]
    fn email_lookup_is_exact() {
        let users = users();
        assert_eq!(find_by_email(&users, "alice@example.com").map(|u| u.id), Some(UserId::new(1)));
        assert!(find_by_email(&users, "Alice@example.com").is_none());
    }

    #[test]
    fn email_availability_ignores_self() {
        let users = users();
        assert!(ensure_email_available(&users, "carol@example.com", None).is_ok());
        assert!(ensure_email_available(&users, "alice@example.com", Some(UserId::new(1))).is_ok());
        assert!(matches!(
            ensure_email_available(&users, "alice@example.com", Some(UserId::new(2))),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn promote_is_idempotent() {
        let mut user = User::new(UserId::new(1), "a@b.c", "h");
        user.promote();
        let once = user.clone();
        user.promote();
        assert_eq!(user, once);
        assert!(user.promoted);
    }

    #[test]
    fn view_hides_digest() {
        let user = User::new(UserId::new(5), "a@b.c", "$argon2id$secret");
        let json = serde_json::to_value(user.view()).unwrap();
        assert_eq!(json, serde_json::json!({ "id": 5, "email": "a@b.c", "is_chirpy_red": false }));
    }

    #[test]
    fn credentials_must_be_present() {
        assert!(validate_credentials("a@b.c", "pw").is_ok());
        assert!(matches!(validate_credentials(" ", "pw"), Err(DomainError::Validation(_))));
        assert!(matches!(validate_credentials("a@b.c", ""), Err(DomainError::Validation(_))));
    }
}
