//! Shared setup for lec-db integration tests.

use std::sync::Arc;
use std::time::Duration;

use lec_db::LecDb;
use lec_db::service::LedgerService;
use tempfile::TempDir;

/// Open a ledger in a fresh temp dir. Keep the `TempDir` alive for the test.
pub async fn open_service() -> (TempDir, Arc<LedgerService>) {
    let dir = tempfile::tempdir().unwrap();
    let db = LecDb::open_local(dir.path().join("ledger.db"), Duration::from_secs(10))
        .await
        .unwrap();
    (dir, Arc::new(LedgerService::from_db(db)))
}
