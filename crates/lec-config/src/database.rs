//! Ledger database configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    String::from(".lectern/lectern.db")
}

/// How long a writer waits for the database write lock before failing.
const fn default_busy_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the ledger database file.
    #[serde(default = "default_path")]
    pub path: String,

    /// Busy timeout applied to every connection, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Resolve the database path against `root` unless it is already absolute.
    #[must_use]
    pub fn resolved_path(&self, root: &std::path::Path) -> PathBuf {
        let path = PathBuf::from(&self.path);
        if path.is_absolute() {
            path
        } else {
            root.join(path)
        }
    }

    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".lectern/lectern.db");
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn relative_path_is_joined_to_root() {
        let config = DatabaseConfig::default();
        let resolved = config.resolved_path(std::path::Path::new("/srv/course"));
        assert_eq!(resolved, PathBuf::from("/srv/course/.lectern/lectern.db"));
    }

    #[test]
    fn absolute_path_is_kept() {
        let config = DatabaseConfig {
            path: String::from("/var/lib/lectern.db"),
            ..DatabaseConfig::default()
        };
        let resolved = config.resolved_path(std::path::Path::new("/srv/course"));
        assert_eq!(resolved, PathBuf::from("/var/lib/lectern.db"));
    }
}
