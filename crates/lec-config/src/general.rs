//! Listing defaults shared by every `list` style command.

use serde::{Deserialize, Serialize};

/// Rows returned when neither the command nor the global flag sets a limit.
const DEFAULT_LIMIT: u32 = 20;

/// Hard cap on rows per listing, whatever the caller asks for.
const MAX_LIMIT: u32 = 1_000;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl GeneralConfig {
    /// Resolve a requested limit against the configured default and cap.
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}
