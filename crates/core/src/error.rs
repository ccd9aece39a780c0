//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error, one variant per error kind the core can report.
///
/// Transport adapters map each variant to a response class; nothing outside
/// this crate should need to inspect the message to decide what happened.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-bound input (e.g. oversized body, unparseable id).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Bad credentials or an invalid/expired/revoked/wrong-kind token.
    #[error("{0}")]
    Authentication(String),

    /// Authenticated, but not permitted to act on the resource.
    #[error("forbidden: {0}")]
    Authorization(String),

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// The request collides with existing state (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage, hashing or signing failure.
    ///
    /// The message is for logs only and must not be echoed to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::Authentication(_) => "unauthenticated",
            DomainError::Authorization(_) => "forbidden",
            DomainError::NotFound => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::Internal(_) => "internal_error",
        }
    }
}
