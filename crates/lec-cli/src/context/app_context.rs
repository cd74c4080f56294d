use std::path::PathBuf;

use anyhow::Context;
use lec_config::LecConfig;
use lec_db::service::LedgerService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: LedgerService,
    pub config: LecConfig,
    pub project_root: PathBuf,
}

impl AppContext {
    /// Open the ledger configured for `project_root`.
    pub async fn init(project_root: PathBuf, config: LecConfig) -> anyhow::Result<Self> {
        let service = LedgerService::open(&config.database, &project_root)
            .await
            .context("failed to open the ledger database")?;
        Ok(Self {
            service,
            config,
            project_root,
        })
    }
}
