//! Audit trail repository.
//!
//! Append-only audit entries recording every mutation. Entries are written on
//! the mutating transaction's connection, so an audit row exists exactly when
//! its mutation committed.

use lec_core::entities::AuditEntry;
use lec_core::enums::{AuditAction, EntityType};
use lec_core::ids::PREFIX_AUDIT;

use crate::error::DatabaseError;
use crate::generate_id;
use crate::helpers::{fmt_ts, get_opt_string, now_utc, parse_datetime, parse_enum, parse_optional_json};
use crate::service::LedgerService;

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    pub limit: Option<u32>,
}

/// Append an audit entry on `conn`. Called by every mutation.
///
/// # Errors
///
/// Returns `DatabaseError` if the INSERT fails.
pub(crate) async fn append_audit(
    conn: &libsql::Connection,
    entity_type: EntityType,
    entity_id: &str,
    action: AuditAction,
    detail: Option<serde_json::Value>,
) -> Result<AuditEntry, DatabaseError> {
    let entry = AuditEntry {
        id: generate_id(conn, PREFIX_AUDIT).await?,
        entity_type,
        entity_id: entity_id.to_string(),
        action,
        detail,
        created_at: now_utc(),
    };
    conn.execute(
        "INSERT INTO audit_trail (id, entity_type, entity_id, action, detail, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            entry.id.as_str(),
            entry.entity_type.as_str(),
            entry.entity_id.as_str(),
            entry.action.as_str(),
            entry.detail.as_ref().map(std::string::ToString::to_string),
            fmt_ts(&entry.created_at)
        ],
    )
    .await?;
    Ok(entry)
}

impl LedgerService {
    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(ref action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("action = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT id, entity_type, entity_id, action, detail, created_at
             FROM audit_trail {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let conn = self.db().connect().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next().await? {
            entries.push(AuditEntry {
                id: row.get::<String>(0)?,
                entity_type: parse_enum(&row.get::<String>(1)?)?,
                entity_id: row.get::<String>(2)?,
                action: parse_enum(&row.get::<String>(3)?)?,
                detail: parse_optional_json(get_opt_string(&row, 4)?.as_deref())?,
                created_at: parse_datetime(&row.get::<String>(5)?)?,
            });
        }

        Ok(entries)
    }
}
