//! Domain-level error types.

use thiserror::Error;

use crate::ports::AuthError;

/// Discriminant of a [`DomainError`], used by the transport layer to pick a
/// status code and the wire `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Permission,
    NotFound,
    Internal,
}

impl ErrorKind {
    pub fn as_type(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Authentication => "AUTHENTICATION_ERROR",
            ErrorKind::Permission => "PERMISSION_ERROR",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND_ERROR",
            ErrorKind::Internal => "INTERNAL_SERVER_ERROR",
        }
    }
}

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Authentication(String),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation(_) => ErrorKind::Validation,
            DomainError::Authentication(_) => ErrorKind::Authentication,
            DomainError::Permission(_) => ErrorKind::Permission,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::Internal(_) => ErrorKind::Internal,
        }
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
        DomainError::Internal(err.to_string())
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => DomainError::Internal(msg),
            AuthError::Signing(msg) => DomainError::Internal(msg),
            other => DomainError::Authentication(other.to_string()),
        }
    }
}

/// Result alias used by every service operation.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_type_strings() {
        assert_eq!(
            DomainError::validation("x").kind().as_type(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            DomainError::permission("x").kind().as_type(),
            "PERMISSION_ERROR"
        );
        assert_eq!(
            DomainError::NotFound("x".into()).kind().as_type(),
            "RESOURCE_NOT_FOUND_ERROR"
        );
    }

    #[test]
    fn test_repo_errors_are_internal() {
        let err: DomainError = RepoError::Query("boom".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_token_errors_are_authentication() {
        let err: DomainError = AuthError::TokenExpired.into();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.to_string(), "Token expired");
    }
}
