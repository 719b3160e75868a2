//! Errors from multi-statement writes.
//!
//! Single-statement repository methods return `sqlx::Error` directly and let
//! the caller classify it. The transactional quote writes need more: they
//! validate before opening the transaction, roll back explicitly, and tell a
//! retryable numbering collision apart from other failures.

use lonas_core::error::CoreError;
use lonas_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// Input or lookup failure raised by domain rules.
    #[error(transparent)]
    Domain(#[from] CoreError),

    /// The referenced client does not exist.
    #[error("Client {0} does not exist")]
    UnknownClient(DbId),

    /// Another writer took the allocated quote number first. Retryable.
    #[error("Quote number {0} is already taken")]
    NumberConflict(String),

    /// Any other storage failure, with the step that failed.
    #[error("{context}: {source}")]
    Persistence {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl WriteError {
    /// Build a `map_err` adapter that tags a sqlx error with `context`.
    pub fn persistence(context: &'static str) -> impl FnOnce(sqlx::Error) -> WriteError {
        move |source| WriteError::Persistence { context, source }
    }
}

impl From<WriteError> for CoreError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Domain(core) => core,
            WriteError::UnknownClient(id) => {
                CoreError::Validation(format!("Client {id} does not exist"))
            }
            WriteError::NumberConflict(number) => CoreError::NumberConflict(format!(
                "Quote number {number} was taken by a concurrent request; please retry"
            )),
            WriteError::Persistence { context, source } => {
                CoreError::PersistenceFailure(format!("{context}: {source}"))
            }
        }
    }
}

/// PostgreSQL SQLSTATE for unique violations.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for foreign key violations.
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Whether `err` is a database error with the given SQLSTATE, optionally
/// restricted to one named constraint.
pub(crate) fn is_constraint_error(err: &sqlx::Error, code: &str, constraint: Option<&str>) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(code)
                && constraint.is_none_or(|c| db_err.constraint() == Some(c))
        }
        _ => false,
    }
}
