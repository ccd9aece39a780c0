//! Configuration loading and representation.
//!
//! Everything process-wide (signing secret, backing file) is read once at
//! startup into an [`AppConfig`] and handed to component constructors.

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;
use thiserror::Error;

use chirpy_auth::DEFAULT_ACCESS_TTL_SECS;

pub const DEFAULT_DATABASE_PATH: &str = "database.json";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct AppConfig {
    /// Symmetric HS256 signing secret.
    pub jwt_secret: String,
    /// Backing file of the document store.
    pub database_path: PathBuf,
    /// Shared key the billing provider presents on webhook calls.
    pub polka_api_key: Option<String>,
    pub bind_addr: SocketAddr,
    pub access_token_ttl: Duration,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("database_path", &self.database_path)
            .field("polka_api_key", &self.polka_api_key.as_ref().map(|_| "<redacted>"))
            .field("bind_addr", &self.bind_addr)
            .field("access_token_ttl", &self.access_token_ttl)
            .finish()
    }
}

impl AppConfig {
    pub fn new(jwt_secret: impl Into<String>, database_path: impl Into<PathBuf>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            database_path: database_path.into(),
            polka_api_key: None,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            access_token_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
        }
    }

    pub fn with_polka_api_key(mut self, key: impl Into<String>) -> Self {
        self.polka_api_key = Some(key.into());
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let database_path = get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());

        let mut config = Self::new(jwt_secret, database_path);
        config.polka_api_key = get("POLKA_API_KEY");

        if let Some(addr) = get("BIND_ADDR") {
            config.bind_addr = addr.parse().map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: format!("{e}"),
            })?;
        }

        if let Some(ttl) = get("ACCESS_TOKEN_TTL_SECS") {
            let secs: i64 = ttl.parse().map_err(|e| ConfigError::Invalid {
                key: "ACCESS_TOKEN_TTL_SECS",
                reason: format!("{e}"),
            })?;
            if secs <= 0 {
                return Err(ConfigError::Invalid {
                    key: "ACCESS_TOKEN_TTL_SECS",
                    reason: "must be positive".to_string(),
                });
            }
            config.access_token_ttl = Duration::seconds(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(
            AppConfig::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert_eq!(
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "  ")])).unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("database.json"));
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.access_token_ttl, Duration::seconds(3_600));
        assert!(cfg.polka_api_key.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "s"),
            ("DATABASE_PATH", "/tmp/x.json"),
            ("POLKA_API_KEY", "k"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("ACCESS_TOKEN_TTL_SECS", "60"),
        ]))
        .unwrap();
        assert_eq!(cfg.database_path, PathBuf::from("/tmp/x.json"));
        assert_eq!(cfg.polka_api_key.as_deref(), Some("k"));
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.access_token_ttl, Duration::seconds(60));
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s"), ("ACCESS_TOKEN_TTL_SECS", "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ACCESS_TOKEN_TTL_SECS", .. }));
    }

    #[test]
    fn debug_redacts_secrets() {
        let cfg = AppConfig::new("super-secret", "db.json").with_polka_api_key("polka-key");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret"));
        assert!(!dbg.contains("polka-key"));
    }
}
