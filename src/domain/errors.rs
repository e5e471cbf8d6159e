//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! `Transient` is the only kind a caller may safely retry; every other kind
//! requires a changed request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Bad input, recoverable by the caller correcting the request
    #[error("validation error: {0}")]
    Validation(String),
    /// Referenced entity absent
    #[error("resource not found")]
    NotFound,
    /// Unique inventory code constraint violated
    #[error("inventory code '{0}' is already registered")]
    DuplicateCode(String),
    /// Requested status move is not in the transition table
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// State precondition failed, usually lost to a concurrent transition
    #[error("{0}")]
    Conflict(String),
    /// Caller lacks the staff capability
    #[error("operation requires the staff role")]
    PermissionDenied,
    /// Storage unavailable or timed out; safe to retry
    #[error("storage unavailable: {0}")]
    Transient(String),
    /// Other persistence failure
    #[error("database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::Conn(err) => DomainError::Transient(err.to_string()),
            sea_orm::DbErr::ConnectionAcquire(err) => DomainError::Transient(err.to_string()),
            other => DomainError::Database(other.to_string()),
        }
    }
}
