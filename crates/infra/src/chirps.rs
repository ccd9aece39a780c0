//! Chirp operations with ownership checks.

use std::sync::Arc;

use chirpy_auth::ensure_owner;
use chirpy_chirps::{Chirp, ChirpQuery, validate_body};
use chirpy_core::{ChirpId, DomainError, DomainResult, UserId};

use crate::store::DocumentStore;

#[derive(Debug, Clone)]
pub struct ChirpManager {
    store: Arc<DocumentStore>,
}

impl ChirpManager {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }

    pub fn create(&self, body: &str, author_id: UserId) -> DomainResult<Chirp> {
        // Reject before touching the store.
        validate_body(body)?;

        let chirp = self.store.update(|doc| {
            if !doc.users.contains_key(&author_id) {
                return Err(DomainError::NotFound);
            }
            let chirp = Chirp::new(doc.next_chirp_id()?, body, author_id)?;
            doc.insert_chirp(chirp.clone());
            Ok(chirp)
        })?;

        tracing::debug!(chirp_id = %chirp.id, author_id = %author_id, "chirp created");
        Ok(chirp)
    }

    pub fn list(&self, query: &ChirpQuery) -> DomainResult<Vec<Chirp>> {
        Ok(self.store.read(|doc| query.apply(doc.chirps.values()))?)
    }

    pub fn get(&self, id: ChirpId) -> DomainResult<Chirp> {
        self.store
            .read(|doc| doc.chirps.get(&id).cloned())?
            .ok_or(DomainError::NotFound)
    }

    /// Delete a chirp authored by `requester_id`, returning it.
    pub fn delete(&self, id: ChirpId, requester_id: UserId) -> DomainResult<Chirp> {
        let removed = self.store.update(|doc| {
            let chirp = doc.chirps.get(&id).ok_or(DomainError::NotFound)?;
            ensure_owner(requester_id, chirp.author_id, "chirp")?;
            doc.chirps.remove(&id).ok_or(DomainError::NotFound)
        })?;

        tracing::info!(chirp_id = %id, author_id = %requester_id, "chirp deleted");
        Ok(removed)
    }
}
