//! Ledger-wide task statistics.

use chrono::{DateTime, Utc};
use lec_core::enums::TaskStatus;
use lec_core::responses::LedgerStats;

use crate::error::DatabaseError;
use crate::finish;
use crate::helpers::{get_count, open_status_list, parse_datetime};
use crate::service::LedgerService;

/// Mean of the durations in seconds, `None` for an empty slice.
#[allow(clippy::cast_precision_loss)]
fn average_seconds(durations: &[chrono::Duration]) -> Option<f64> {
    if durations.is_empty() {
        return None;
    }
    let total: f64 = durations
        .iter()
        .map(|d| d.num_milliseconds() as f64 / 1000.0)
        .sum();
    Some(total / durations.len() as f64)
}

async fn read_stats(
    conn: &libsql::Connection,
    now: DateTime<Utc>,
) -> Result<LedgerStats, DatabaseError> {
    let mut stats = LedgerStats::empty();

    let mut rows = conn
        .query("SELECT status, COUNT(*) FROM tasks GROUP BY status", ())
        .await?;
    while let Some(row) = rows.next().await? {
        let count = get_count(&row, 1)?;
        stats.total += count;
        stats.counts_by_status.insert(row.get::<String>(0)?, count);
    }

    let mut rows = conn
        .query("SELECT kind, COUNT(*) FROM tasks GROUP BY kind", ())
        .await?;
    while let Some(row) = rows.next().await? {
        stats
            .counts_by_kind
            .insert(row.get::<String>(0)?, get_count(&row, 1)?);
    }

    let mut rows = conn
        .query(
            "SELECT created_at, completed_at FROM tasks
             WHERE status = ?1 AND completed_at IS NOT NULL",
            [TaskStatus::Completed.as_str()],
        )
        .await?;
    let mut durations = Vec::new();
    while let Some(row) = rows.next().await? {
        let created = parse_datetime(&row.get::<String>(0)?)?;
        let completed = parse_datetime(&row.get::<String>(1)?)?;
        durations.push(completed - created);
    }
    stats.average_completion_seconds = average_seconds(&durations);

    let mut rows = conn
        .query(
            &format!(
                "SELECT created_at FROM tasks
                 WHERE status IN ({})
                 ORDER BY created_at ASC LIMIT 1",
                open_status_list()
            ),
            (),
        )
        .await?;
    if let Some(row) = rows.next().await? {
        let oldest = parse_datetime(&row.get::<String>(0)?)?;
        stats.oldest_pending_age_seconds = Some((now - oldest).num_seconds().max(0));
    }

    Ok(stats)
}

impl LedgerService {
    /// Aggregate task counts and timings from one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn stats(&self) -> Result<LedgerStats, DatabaseError> {
        let tx = self.db().begin_read().await?;
        let result = read_stats(&tx, Utc::now()).await;
        finish(tx, result).await
    }
}
