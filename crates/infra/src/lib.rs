//! Infrastructure layer: persistent store, configuration, and the services
//! that combine them with the pure domain and auth crates.

pub mod accounts;
pub mod chirps;
pub mod config;
pub mod sessions;
pub mod store;

pub use accounts::{AccountManager, LoginResult};
pub use chirps::ChirpManager;
pub use config::{AppConfig, ConfigError};
pub use sessions::SessionManager;
pub use store::{Document, DocumentStore, StoreError};
