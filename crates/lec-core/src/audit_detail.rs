//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! fix the shape of the detail for the actions the ledger emits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::version::MaterialVersion;

/// Detail for `AuditAction::StatusChanged`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::VersionRecorded`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VersionRecordedDetail {
    pub version: MaterialVersion,
    pub storage_path: String,
    pub task_id: Option<String>,
}

/// Detail for `AuditAction::Created` on slugged entities.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RegisteredDetail {
    pub name: String,
    pub slug: String,
}
