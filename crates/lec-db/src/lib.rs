//! # lec-db
//!
//! libSQL storage for the Lectern ledger: subjects, topics, materials and
//! their version history, generation tasks, learning outcomes and the audit
//! trail.
//!
//! Every operation opens its own connection from the shared
//! [`libsql::Database`], so a single [`service::LedgerService`] can be shared
//! across tasks behind an `Arc`. Mutations run inside `BEGIN IMMEDIATE`
//! transactions: concurrent writers queue on the database write lock (bounded
//! by `busy_timeout`) and every check-then-write sequence sees no interleaved
//! writes.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;
use std::time::Duration;

use error::DatabaseError;
use libsql::{Builder, Connection, Transaction, TransactionBehavior};
use tracing::warn;

/// Central database handle for the ledger.
pub struct LecDb {
    db: libsql::Database,
    busy_timeout: Duration,
}

impl LecDb {
    /// Open (or create) a local database file.
    ///
    /// Switches the file to WAL mode and runs migrations. The path must name a
    /// file: `":memory:"` would give every connection its own empty database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(
        path: impl AsRef<Path>,
        busy_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Migration(format!("create {}: {e}", parent.display()))
            })?;
        }

        let db = Builder::new_local(path).build().await?;
        let lec_db = Self { db, busy_timeout };

        let conn = lec_db.connect().await?;
        pragma(&conn, "PRAGMA journal_mode = WAL").await?;
        drop(conn);

        lec_db.run_migrations().await?;
        Ok(lec_db)
    }

    /// Open a fresh connection with per-connection pragmas applied.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or a pragma fails.
    pub async fn connect(&self) -> Result<Connection, DatabaseError> {
        let conn = self.db.connect()?;

        // Foreign keys are off by default in SQLite and must be enabled per connection.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;
        pragma(
            &conn,
            &format!("PRAGMA busy_timeout = {}", self.busy_timeout.as_millis()),
        )
        .await?;

        Ok(conn)
    }

    /// Start a write transaction holding the database write lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lock is not acquired within the busy timeout.
    pub async fn begin_write(&self) -> Result<Transaction, DatabaseError> {
        let conn = self.connect().await?;
        Ok(conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?)
    }

    /// Start a read transaction so multi-statement reads see one snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot be started.
    pub async fn begin_read(&self) -> Result<Transaction, DatabaseError> {
        let conn = self.connect().await?;
        Ok(conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .await?)
    }
}

/// Run a pragma that answers with a row; `execute` rejects those.
async fn pragma(conn: &Connection, sql: &str) -> Result<(), DatabaseError> {
    let mut rows = conn
        .query(sql, ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("{sql}: {e}")))?;
    rows.next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("{sql}: {e}")))?;
    Ok(())
}

/// Commit `tx` if `result` is `Ok`, roll it back otherwise.
///
/// # Errors
///
/// Returns the original error, or the commit error.
pub async fn finish<T>(
    tx: Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(%rollback, "rollback failed");
            }
            Err(error)
        }
    }
}

/// Generate a prefixed ID via libSQL. Returns e.g. `"tsk-a3f8b2c10d9e4f71"`.
///
/// 64 random bits (`randomblob(8)`, 16 hex chars): task and audit rows are
/// never pruned, so the ID space has to stay sparse for the ledger's lifetime.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or returns no rows.
pub async fn generate_id(conn: &Connection, prefix: &str) -> Result<String, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT '{prefix}-' || lower(hex(randomblob(8)))"),
            (),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<String>(0)?)
}
