//! Error types for storage and cache operations
//!
//! Failures from the persistence and cache collaborators. These surface
//! unchanged to the engine, which decides what may degrade (cache reads)
//! and what must propagate (association writes).

use thiserror::Error;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique-name constraint violation
    #[error("duplicate {entity} name: {name}")]
    DuplicateName {
        /// The entity kind ("role" or "permission")
        entity: &'static str,
        /// The conflicting name
        name: String,
    },

    /// Backend connection failure
    #[error("connection error: {0}")]
    Connection(String),

    /// Value could not be serialized or deserialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Internal backend error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Check if this error is a unique-name constraint violation.
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateName { .. })
    }
}
