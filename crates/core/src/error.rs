use serde::Serialize;

use crate::types::DbId;

/// A single field-level validation failure.
///
/// Serialized as `{ "path": ..., "msg": ... }`, the shape the browser
/// application renders next to form inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    FieldErrors(Vec<FieldError>),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("This document is already registered")]
    DuplicateDocument,

    #[error("The document belongs to another client")]
    DocumentBelongsToAnother,

    #[error("This email is already registered")]
    DuplicateEmail,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid line item {index}: {field} {reason}")]
    InvalidLineItem {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Quote number conflict: {0}")]
    NumberConflict(String),

    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("User {0} is the bootstrap administrator and cannot be deleted")]
    ProtectedUser(DbId),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Whether the caller may resubmit the same request and expect success.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::NumberConflict(_))
    }
}
