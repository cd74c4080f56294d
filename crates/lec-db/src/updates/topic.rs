//! Topic update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl TopicUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

pub struct TopicUpdateBuilder(TopicUpdate);

impl TopicUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TopicUpdate::default())
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.0.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub fn build(self) -> TopicUpdate {
        self.0
    }
}

impl Default for TopicUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
