//! Error types for authorization operations
//!
//! This module defines all error types the engine, gates, and guards
//! can produce, along with their mapping to HTTP-style status codes so
//! callers can distinguish authentication failures (401) from
//! authorization denials (403) and resolution misses (404).

use thiserror::Error;
use warden_store::StoreError;

/// Authorization error types.
#[derive(Debug, Error)]
pub enum RbacError {
    /// Strict resolution found no role with the given name
    #[error("there is no role named `{0}`")]
    RoleNotFound(String),

    /// Strict resolution found no permission with the given name
    #[error("there is no permission named `{0}`")]
    PermissionNotFound(String),

    /// A gateway check was invoked with no authenticated subject
    #[error("authentication required")]
    AuthenticationRequired,

    /// Subject lacks the required role(s)
    #[error("user does not have role: {0}")]
    RoleNotAssigned(String),

    /// Subject lacks the required permission(s)
    #[error("user does not have permission: {0}")]
    PermissionDenied(String),

    /// Refused to delete a guarded role
    #[error("role `{0}` is guarded and cannot be deleted")]
    RoleProtected(String),

    /// Failure from the persistence or cache collaborator
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for authorization operations.
pub type RbacResult<T> = Result<T, RbacError>;

impl RbacError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials and resolution misses are expected outcomes and should
    /// not be logged as errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, RbacError::Store(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RbacError::RoleNotFound(_) | RbacError::PermissionNotFound(_) => 404,
            RbacError::AuthenticationRequired => 401,
            RbacError::RoleNotAssigned(_)
            | RbacError::PermissionDenied(_)
            | RbacError::RoleProtected(_) => 403,
            RbacError::Store(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RbacError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            RbacError::PermissionNotFound(_) => "PERMISSION_NOT_FOUND",
            RbacError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            RbacError::RoleNotAssigned(_) => "ROLE_NOT_ASSIGNED",
            RbacError::PermissionDenied(_) => "PERMISSION_DENIED",
            RbacError::RoleProtected(_) => "ROLE_PROTECTED",
            RbacError::Store(_) => "STORAGE_ERROR",
        }
    }
}
