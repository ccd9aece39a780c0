use chirpy_core::{DomainError, UserId};

/// Ownership check: only the owner of a resource may act on it.
///
/// - No IO
/// - No panics
pub fn ensure_owner(requester: UserId, owner: UserId, what: &str) -> Result<(), DomainError> {
    if requester == owner {
        Ok(())
    } else {
        Err(DomainError::authorization(format!("you are not the author of this {what}")))
    }
}
