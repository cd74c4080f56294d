//! Producer-reported details accompanying a task status change.

use lec_core::enums::OutputFormat;

/// Optional payload for [`crate::service::LedgerService::update_status`].
///
/// `storage_path` is required when completing a task; `error` is recorded when
/// failing one. Other fields are ignored for transitions that do not use them.
/// A missing `format` is inferred by the version manager.
#[derive(Debug, Clone, Default)]
pub struct StatusPayload {
    pub storage_path: Option<String>,
    pub format: Option<OutputFormat>,
    pub error: Option<String>,
}

impl StatusPayload {
    #[must_use]
    pub fn completed(storage_path: impl Into<String>) -> Self {
        Self {
            storage_path: Some(storage_path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }
}
