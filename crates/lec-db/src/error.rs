//! Database error types for lec-db.

use lec_core::errors::{CoreError, ErrorKind};
use thiserror::Error;

/// Errors from ledger operations.
///
/// The first five variants are the domain outcomes callers act on; the rest
/// are storage failures and classify as [`ErrorKind::Internal`].
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A name sanitized to an empty slug.
    #[error("Invalid name '{0}': produces an empty slug")]
    InvalidName(String),

    /// A uniqueness rule was violated or a concurrent writer won.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A referenced subject, topic, material, or task does not exist.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// The requested status change is not in the transition table.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Request payload failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName(_) => ErrorKind::InvalidName,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Query(_)
            | Self::Migration(_)
            | Self::NoResult
            | Self::LibSql(_)
            | Self::Other(_) => ErrorKind::Internal,
        }
    }
}

impl From<CoreError> for DatabaseError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::InvalidName(name) => Self::InvalidName(name),
            CoreError::Conflict(msg) => Self::Conflict(msg),
            CoreError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            CoreError::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            } => Self::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            },
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Other(err) => Self::Other(err),
        }
    }
}
