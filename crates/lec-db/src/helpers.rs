//! Row-to-entity parsing helpers.
//!
//! Every repo converts `libsql::Row` (column-indexed) into typed entity
//! structs. These helpers isolate the parsing and the timestamp encoding.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use lec_core::enums::TaskStatus;

use crate::error::DatabaseError;

/// Current time at the precision the ledger stores.
///
/// Values returned from a write compare equal to the same row read back.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Encode a timestamp as fixed-width RFC 3339 text.
///
/// Every stored timestamp has the same width and a `Z` suffix, so ordering by
/// the TEXT column is chronological.
#[must_use]
pub fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not RFC 3339.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse an optional TEXT column as `Option<DateTime<Utc>>`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string cannot be parsed.
pub fn parse_optional_datetime(s: Option<&str>) -> Result<Option<DateTime<Utc>>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => Ok(Some(parse_datetime(s)?)),
        _ => Ok(None),
    }
}

/// Parse a TEXT column into a serde-deserializable enum.
///
/// Works with all lec-core enums that use `#[serde(rename_all = "snake_case")]`.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string does not match any enum variant.
pub fn parse_enum<T: serde::de::DeserializeOwned>(s: &str) -> Result<T, DatabaseError> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| DatabaseError::Query(format!("Failed to parse enum from '{s}': {e}")))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// `row.get::<String>(idx)` on a NULL column returns an error, not `""`.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// Read a non-negative INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the value is negative or too large.
pub fn get_u32(row: &libsql::Row, idx: i32) -> Result<u32, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u32::try_from(raw)
        .map_err(|_| DatabaseError::Query(format!("column {idx} out of range: {raw}")))
}

/// Read a `COUNT(*)` column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the count is negative.
pub fn get_count(row: &libsql::Row, idx: i32) -> Result<u64, DatabaseError> {
    let raw = row.get::<i64>(idx)?;
    u64::try_from(raw).map_err(|_| DatabaseError::Query(format!("negative count: {raw}")))
}

/// Extract an optional JSON value from a TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if a non-empty string contains invalid JSON.
pub fn parse_optional_json(s: Option<&str>) -> Result<Option<serde_json::Value>, DatabaseError> {
    match s {
        Some(s) if !s.is_empty() => {
            let val = serde_json::from_str(s)
                .map_err(|e| DatabaseError::Query(format!("Invalid JSON in column: {e}")))?;
            Ok(Some(val))
        }
        _ => Ok(None),
    }
}

/// Serialize a value for a JSON TEXT column.
///
/// # Errors
///
/// Returns `DatabaseError::Other` if serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, DatabaseError> {
    serde_json::to_value(value).map_err(|e| DatabaseError::Other(e.into()))
}

/// True when a libSQL error is a `UNIQUE` constraint violation.
#[must_use]
pub fn is_unique_violation(error: &libsql::Error) -> bool {
    error.to_string().contains("UNIQUE constraint failed")
}

/// SQL `IN` list of the open task statuses, e.g. `'pending', 'in_progress'`.
#[must_use]
pub fn open_status_list() -> String {
    TaskStatus::ALL
        .into_iter()
        .filter(|status| status.is_open())
        .map(|status| format!("'{}'", status.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether the violated constraint is a table's `id` primary key alone.
///
/// SQLite names the columns after the prefix, e.g.
/// `UNIQUE constraint failed: subjects.id`.
pub fn is_id_collision(error: &libsql::Error) -> bool {
    let message = error.to_string();
    let Some((_, columns)) = message.split_once("UNIQUE constraint failed: ") else {
        return false;
    };
    let columns = columns
        .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ',' | ' ')))
        .next()
        .unwrap_or_default()
        .trim();
    !columns.contains(',') && columns.ends_with(".id")
}

/// Map a failed INSERT/UPDATE to `Conflict` when a UNIQUE index rejected it.
///
/// Covers the window the in-transaction pre-check cannot see, such as a
/// writer that bypassed the service. A generated-ID collision is not the
/// caller's conflict and stays a storage error.
pub fn unique_conflict(error: libsql::Error, message: impl FnOnce() -> String) -> DatabaseError {
    if is_unique_violation(&error) && !is_id_collision(&error) {
        DatabaseError::Conflict(message())
    } else {
        DatabaseError::LibSql(error)
    }
}
