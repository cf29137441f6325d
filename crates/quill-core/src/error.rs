//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::ports::AuthError;

/// Domain errors - business logic failures.
///
/// Every operation of the services in [`crate::services`] fails with one of these; the HTTP
/// layer maps each variant onto exactly one status code.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity_type} not found")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Server error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InsufficientPermissions => DomainError::Forbidden(err.to_string()),
            AuthError::MissingSecret => DomainError::Config(err.to_string()),
            AuthError::HashingError(msg) => DomainError::Internal(msg),
            AuthError::InvalidToken(_) => DomainError::Unauthorized("Invalid token".to_string()),
            other => DomainError::Unauthorized(other.to_string()),
        }
    }
}
