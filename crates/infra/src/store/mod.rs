//! Whole-document persistent store.
//!
//! All state lives in one [`Document`] that is loaded and replaced as a unit.
//! A single process-wide lock serializes every access. Read-modify-write
//! operations must go through [`DocumentStore::update`], which holds the lock
//! across load, mutation and write-back; calling [`DocumentStore::load`] and
//! then [`DocumentStore::replace`] separately can lose concurrent updates.

pub mod backend;
pub mod document;

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use chirpy_core::DomainError;

pub use backend::{DocumentBackend, InMemoryBackend, JsonFileBackend};
pub use document::{Document, RefreshTokenRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document (de)serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend lock poisoned")]
    Poisoned,
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::internal(value.to_string())
    }
}

/// Owner of the persisted [`Document`].
///
/// Callers only ever receive copies; nothing holds a reference to the stored
/// document across calls.
pub struct DocumentStore {
    backend: Box<dyn DocumentBackend>,
    lock: Mutex<()>,
}

impl core::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore {
    pub fn new(backend: impl DocumentBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Mutex::new(()),
        }
    }

    /// File-backed store. Fails fast if an existing file cannot be parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let backend = JsonFileBackend::new(path);
        let path = backend.path().to_path_buf();
        let store = Self::new(backend);
        let doc = store.load()?;
        tracing::info!(
            path = %path.display(),
            users = doc.users.len(),
            chirps = doc.chirps.len(),
            "opened document store"
        );
        Ok(store)
    }

    pub fn in_memory() -> Self {
        Self::new(InMemoryBackend::new())
    }

    fn acquire(&self) -> MutexGuard<'_, ()> {
        // The guard protects no data; the document on disk is only ever
        // swapped whole, so a panic while locked cannot leave it half-written.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load_locked(&self) -> Result<Document, StoreError> {
        match self.backend.read_bytes()? {
            None => Ok(Document::default()),
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
        }
    }

    fn replace_locked(&self, document: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(document)?;
        self.backend.write_bytes(&bytes)?;
        tracing::debug!(bytes = bytes.len(), "document replaced");
        Ok(())
    }

    /// Load a copy of the current document (empty if nothing stored yet).
    pub fn load(&self) -> Result<Document, StoreError> {
        let _guard = self.acquire();
        self.load_locked()
    }

    /// Overwrite the stored document.
    pub fn replace(&self, document: Document) -> Result<(), StoreError> {
        let _guard = self.acquire();
        self.replace_locked(&document)
    }

    /// Run a read-only view over the current document under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, StoreError> {
        let _guard = self.acquire();
        let doc = self.load_locked()?;
        Ok(f(&doc))
    }

    /// Atomic load-mutate-write.
    ///
    /// The lock is held for the whole cycle. `f` works on a local copy; the
    /// copy is written back only if `f` returns `Ok`, so a rejected operation
    /// leaves the store untouched.
    pub fn update<T, E>(&self, f: impl FnOnce(&mut Document) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let _guard = self.acquire();
        let mut doc = self.load_locked()?;
        let out = f(&mut doc)?;
        self.replace_locked(&doc)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chirpy_core::{ChirpId, DomainResult, UserId};
    use chirpy_users::User;

    use super::*;

    struct FailingWrites {
        inner: InMemoryBackend,
        writes: AtomicUsize,
    }

    impl DocumentBackend for FailingWrites {
        fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
            self.inner.read_bytes()
        }

        fn write_bytes(&self, _bytes: &[u8]) -> Result<(), StoreError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Io {
                path: PathBuf::from("/dev/full"),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[test]
    fn fresh_store_loads_empty_document() {
        let store = DocumentStore::in_memory();
        assert_eq!(store.load().unwrap(), Document::default());
    }

    #[test]
    fn replace_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path().join("db.json")).unwrap();

        let mut doc = store.load().unwrap();
        doc.users.insert(UserId::new(1), User::new(UserId::new(1), "a@b.c", "h"));
        store.replace(doc.clone()).unwrap();

        let reopened = DocumentStore::open(dir.path().join("db.json")).unwrap();
        assert_eq!(reopened.load().unwrap(), doc);
    }

    #[test]
    fn open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, b"{ not json").unwrap();
        assert!(matches!(DocumentStore::open(&path), Err(StoreError::Serialization(_))));
    }

    #[test]
    fn failed_update_does_not_write() {
        let store = DocumentStore::in_memory();
        let result: DomainResult<()> = store.update(|doc| {
            doc.users.insert(UserId::new(1), User::new(UserId::new(1), "a@b.c", "h"));
            Err(DomainError::validation("nope"))
        });
        assert!(result.is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn write_failures_surface_as_internal() {
        let store = DocumentStore::new(FailingWrites {
            inner: InMemoryBackend::new(),
            writes: AtomicUsize::new(0),
        });
        let err = store
            .update(|doc| -> DomainResult<()> {
                doc.chirps.clear();
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn concurrent_updates_are_serialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DocumentStore::open(dir.path().join("db.json")).unwrap());

        std::thread::scope(|s| {
            for t in 0..8u64 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    for i in 0..10u64 {
                        store
                            .update(|doc| -> Result<(), StoreError> {
                                let id = doc.next_user_id().unwrap();
                                let email = format!("t{t}-{i}@example.com");
                                doc.users.insert(id, User::new(id, email, "h"));
                                Ok(())
                            })
                            .unwrap();
                    }
                });
            }
        });

        let doc = store.load().unwrap();
        assert_eq!(doc.users.len(), 80);
        assert_eq!(doc.next_user_id().unwrap(), UserId::new(81));
        assert_eq!(doc.next_chirp_id().unwrap(), ChirpId::new(1));
    }
}
