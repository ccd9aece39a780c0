//! One-way password hashing (Argon2id, PHC string format).

use argon2::{
    Argon2,
    password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;

use chirpy_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("stored password hash is malformed: {0}")]
    MalformedDigest(String),
}

impl From<PasswordError> for DomainError {
    fn from(value: PasswordError) -> Self {
        DomainError::internal(value.to_string())
    }
}

/// Salted, adaptive-cost credential verifier.
///
/// Uses the Argon2id defaults recommended by the `argon2` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::default()
    }

    /// Hash `plaintext` with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Check `plaintext` against a stored digest.
    ///
    /// A mismatch is `Ok(false)`; only an unreadable digest is an error.
    pub fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(digest).map_err(|e| PasswordError::MalformedDigest(e.to_string()))?;

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Hash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_original_and_rejects_others() {
        let hasher = PasswordHasher::new();
        let digest = hasher.hash("secret123").unwrap();

        assert!(digest.starts_with("$argon2"));
        assert_ne!(digest, "secret123");
        assert_eq!(hasher.verify("secret123", &digest), Ok(true));
        assert_eq!(hasher.verify("secret124", &digest), Ok(false));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = PasswordHasher::new();
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn malformed_digest_is_an_error_not_a_mismatch() {
        let hasher = PasswordHasher::new();
        let err = hasher.verify("pw", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, PasswordError::MalformedDigest(_)));
        assert!(matches!(DomainError::from(err), DomainError::Internal(_)));
    }
}
