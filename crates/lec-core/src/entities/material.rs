use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MaterialKind, OutputFormat};
use crate::version::MaterialVersion;

/// The current version record of one material kind for a topic.
///
/// There is at most one `Material` per `(topic_id, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Material {
    pub id: String,
    pub topic_id: String,
    pub kind: MaterialKind,
    pub format: OutputFormat,
    pub version: MaterialVersion,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in a material's version history.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MaterialRevision {
    pub material_id: String,
    pub version: MaterialVersion,
    pub storage_path: String,
    pub task_id: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
