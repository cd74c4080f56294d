//! Service layer orchestrating ledger mutations with the audit trail.
//!
//! `LedgerService` wraps `LecDb`. All repo methods are implemented as
//! `impl LedgerService` blocks under [`crate::repos`].

use std::path::Path;

use lec_config::DatabaseConfig;

use crate::LecDb;
use crate::error::DatabaseError;

/// Entry point for every ledger operation.
///
/// Every mutation method follows this protocol:
/// 1. Begin an IMMEDIATE transaction on a fresh connection
/// 2. Re-read and validate current state
/// 3. Execute SQL
/// 4. Append audit entry (inside transaction)
/// 5. Commit, or roll back on any error
///
/// The service holds no per-call state and is `Send + Sync`; share it with
/// `Arc<LedgerService>`.
pub struct LedgerService {
    db: LecDb,
}

impl LedgerService {
    /// Open the ledger described by `config`, resolving relative paths
    /// against `root`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn open(config: &DatabaseConfig, root: &Path) -> Result<Self, DatabaseError> {
        let path = config.resolved_path(root);
        tracing::debug!(path = %path.display(), "opening ledger");
        let db = LecDb::open_local(&path, config.busy_timeout()).await?;
        Ok(Self { db })
    }

    /// Create from an existing `LecDb`.
    #[must_use]
    pub const fn from_db(db: LecDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &LecDb {
        &self.db
    }
}
