use std::sync::Arc;

use chirpy_auth::TokenService;
use chirpy_core::{DomainError, DomainResult};
use chirpy_infra::{AccountManager, AppConfig, ChirpManager, DocumentStore, SessionManager, StoreError};

/// Core services shared by all handlers.
#[derive(Debug, Clone)]
pub struct AppServices {
    pub accounts: AccountManager,
    pub sessions: Arc<SessionManager>,
    pub chirps: ChirpManager,
    pub polka_api_key: Option<String>,
}

impl AppServices {
    pub fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store = Arc::new(DocumentStore::open(&config.database_path)?);
        Ok(Self::new(store, config))
    }

    pub fn new(store: Arc<DocumentStore>, config: &AppConfig) -> Self {
        let tokens = Arc::new(
            TokenService::new(config.jwt_secret.as_bytes()).with_access_ttl(config.access_token_ttl),
        );

        Self {
            accounts: AccountManager::new(store.clone(), tokens.clone()),
            sessions: Arc::new(SessionManager::new(store.clone(), tokens)),
            chirps: ChirpManager::new(store),
            polka_api_key: config.polka_api_key.clone(),
        }
    }
}

/// Run a synchronous core operation (file IO, password hashing) on the
/// blocking pool.
pub async fn blocking<T, F>(f: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DomainError::internal(format!("blocking task failed: {e}")))?
}
