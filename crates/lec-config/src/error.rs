use thiserror::Error;

/// Failure to produce a usable [`crate::LecConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A TOML file or environment variable could not be read into the config.
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    /// Loaded fine, but a value would leave the ledger unusable.
    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}
