//! Embedded schema migrations, applied in order every time the ledger opens.
//!
//! Each script is idempotent (`IF NOT EXISTS` throughout), so re-running on an
//! existing database is a no-op.

use crate::LecDb;
use crate::error::DatabaseError;

/// `(name, sql)` pairs in application order.
const MIGRATIONS: &[(&str, &str)] = &[("001_ledger", include_str!("../migrations/001_ledger.sql"))];

impl LecDb {
    pub(crate) async fn run_migrations(&self) -> Result<(), DatabaseError> {
        let conn = self.connect().await?;
        for (name, sql) in MIGRATIONS {
            conn.execute_batch(sql)
                .await
                .map_err(|e| DatabaseError::Migration(format!("{name}: {e}")))?;
            tracing::debug!(migration = name, "applied migration");
        }
        Ok(())
    }
}
