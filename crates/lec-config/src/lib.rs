//! # lec-config
//!
//! Layered configuration loading for Lectern using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LECTERN_*` prefix, `__` as separator)
//! 2. Project-level `.lectern/config.toml`
//! 3. User-level `~/.config/lectern/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LECTERN_DATABASE__PATH` -> `database.path`,
//! `LECTERN_GENERAL__DEFAULT_LIMIT` -> `general.default_limit`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use lec_config::LecConfig;
//!
//! let config = LecConfig::load_with_dotenv().expect("config");
//! println!("ledger at {}", config.database.path);
//! ```

mod database;
mod error;
mod general;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local directory holding the ledger database and config.
pub const PROJECT_DIR: &str = ".lectern";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LecConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl LecConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_DIR).join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("LECTERN_").split("__"))
    }

    /// Reject values that would make the ledger unusable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "database.path",
                reason: "must not be empty".into(),
            });
        }
        if self.general.default_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "general.default_limit",
                reason: "must be at least 1".into(),
            });
        }
        if self.general.max_limit < self.general.default_limit {
            return Err(ConfigError::Invalid {
                field: "general.max_limit",
                reason: format!(
                    "must not be below general.default_limit ({})",
                    self.general.default_limit
                ),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lectern").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LecConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn empty_database_path_is_rejected() {
        let mut config = LecConfig::default();
        config.database.path = String::from("  ");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("database.path"));
    }

    #[test]
    fn cap_below_default_is_rejected() {
        let mut config = LecConfig::default();
        config.general.max_limit = 5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("general.max_limit"));
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut config = LecConfig::default();
        config.general.default_limit = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
