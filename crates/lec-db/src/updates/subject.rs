//! Subject update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SubjectUpdate {
    /// New display name; the slug is re-derived from it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl SubjectUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

pub struct SubjectUpdateBuilder(SubjectUpdate);

impl SubjectUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SubjectUpdate::default())
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
    pub fn build(self) -> SubjectUpdate {
        self.0
    }
}

impl Default for SubjectUpdateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
