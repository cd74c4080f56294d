use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::enums::{AuditAction, EntityType};

/// One row of the append-only audit trail.
///
/// Rows outlive the entity they describe: deleting a subject cascades to its
/// topics and tasks, but their history stays queryable by `entity_id`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AuditEntry {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: AuditAction,
    /// Shape depends on `action`; see [`crate::audit_detail`].
    pub detail: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    /// Decode `detail` into its typed form, `None` when absent or mismatched.
    #[must_use]
    pub fn detail_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.detail
            .clone()
            .and_then(|value| serde_json::from_value(value).ok())
    }
}
