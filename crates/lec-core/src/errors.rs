//! Cross-cutting error types for Lectern.
//!
//! This module defines errors that can originate from any crate in the system.
//! Storage errors (`DatabaseError`) live in `lec-db` and convert from
//! `CoreError`. Both classify into an [`ErrorKind`], which is what the
//! transport boundary reports to callers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can be raised by any Lectern crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Slug derivation produced an empty result.
    #[error("Invalid name '{0}': produces an empty slug")]
    InvalidName(String),

    /// A uniqueness rule was violated, or a concurrent writer won the race.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, missing payload fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    /// Convenience constructor for [`CoreError::NotFound`].
    #[must_use]
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
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
            Self::Other(_) => ErrorKind::Internal,
        }
    }
}

/// Failure classification reported across the request/response boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidName,
    Conflict,
    NotFound,
    InvalidTransition,
    Validation,
    Internal,
}

impl ErrorKind {
    /// HTTP-style status code for this failure kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Conflict | Self::InvalidTransition => 409,
            Self::InvalidName | Self::Validation => 422,
            Self::Internal => 500,
        }
    }

    /// Whether the caller caused the failure (as opposed to the ledger itself).
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(self, Self::Internal)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidName => "invalid_name",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
