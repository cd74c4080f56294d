use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MaterialKind, TaskStatus};

/// A request to generate one kind of material for a topic.
///
/// Tasks are append-only audit records: they change only through the status
/// state machine and are removed only when their topic is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub topic_id: String,
    pub kind: MaterialKind,
    pub status: TaskStatus,
    /// Opaque generation parameters supplied by the requester.
    pub params: serde_json::Value,
    pub material_id: Option<String>,
    pub error_detail: Option<String>,
    /// 1-based; incremented each time a failed task is requeued.
    pub attempt: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Seconds from creation to completion, for completed tasks.
    #[must_use]
    pub fn completion_seconds(&self) -> Option<i64> {
        self.completed_at
            .map(|done| (done - self.created_at).num_seconds())
    }
}
