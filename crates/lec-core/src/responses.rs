//! Response types returned as JSON by `lec` commands.
//!
//! These are read-side projections; none of them is persisted.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MaterialKind, TaskStatus};

/// Ledger-wide task statistics (`lec stats`).
///
/// `counts_by_status` and `counts_by_kind` always contain every status and
/// kind, so the status counts sum to `total`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LedgerStats {
    pub total: u64,
    pub counts_by_status: BTreeMap<String, u64>,
    pub counts_by_kind: BTreeMap<String, u64>,
    /// Mean of `completed_at - created_at` over completed tasks; absent when none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_completion_seconds: Option<f64>,
    /// Age of the oldest open (pending or in-progress) task; absent when none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_pending_age_seconds: Option<i64>,
}

impl LedgerStats {
    /// Zero-filled statistics for an empty ledger.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total: 0,
            counts_by_status: TaskStatus::ALL
                .iter()
                .map(|s| (s.as_str().to_string(), 0))
                .collect(),
            counts_by_kind: MaterialKind::ALL
                .iter()
                .map(|k| (k.as_str().to_string(), 0))
                .collect(),
            average_completion_seconds: None,
            oldest_pending_age_seconds: None,
        }
    }

    #[must_use]
    pub fn status_count(&self, status: TaskStatus) -> u64 {
        self.counts_by_status
            .get(status.as_str())
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn kind_count(&self, kind: MaterialKind) -> u64 {
        self.counts_by_kind.get(kind.as_str()).copied().unwrap_or(0)
    }
}

/// Per-subject rollup (`lec subject stats`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SubjectStats {
    pub subject_id: String,
    pub topic_count: u64,
    pub materials_by_kind: BTreeMap<String, u64>,
    pub open_tasks: u64,
}

/// Response from `lec sanitize`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SanitizeResponse {
    pub name: String,
    pub slug: String,
    pub valid: bool,
}

/// Error envelope printed by `lec` when an operation fails.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
    pub message: String,
}
