use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::BloomLevel;

/// A course learning outcome attached to a topic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Clo {
    pub id: String,
    pub topic_id: String,
    pub text: String,
    pub bloom_level: Option<BloomLevel>,
    pub created_at: DateTime<Utc>,
}
