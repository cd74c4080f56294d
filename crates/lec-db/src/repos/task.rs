//! Task ledger: creation, the status state machine, and backlog queries.
//!
//! Every status change re-reads the task under the write lock, validates the
//! move with [`TaskStatus::can_transition_to`], and applies it with a
//! compare-and-set on the status it read. A completion records the material
//! version in the same transaction.

use lec_core::audit_detail::StatusChangedDetail;
use lec_core::entities::Task;
use lec_core::enums::{AuditAction, EntityType, MaterialKind, TaskStatus};
use lec_core::ids::PREFIX_TASK;
use tracing::{debug, warn};

use crate::error::DatabaseError;
use crate::helpers::{
    fmt_ts, get_opt_string, get_u32, now_utc, parse_datetime, parse_enum,
    open_status_list, parse_optional_datetime, to_json,
};
use crate::repos::audit::append_audit;
use crate::repos::material::{Completion, record_completion_in};
use crate::repos::topic::require_topic;
use crate::service::LedgerService;
use crate::updates::task::StatusPayload;
use crate::{finish, generate_id};

const SELECT_COLS: &str = "id, topic_id, kind, status, params, material_id, error_detail, \
                           attempt, created_at, updated_at, started_at, completed_at";

/// Recorded when a producer reports failure without a reason.
pub const DEFAULT_FAILURE: &str = "generation failed";

fn row_to_task(row: &libsql::Row) -> Result<Task, DatabaseError> {
    let params = row.get::<String>(4)?;
    Ok(Task {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        status: parse_enum(&row.get::<String>(3)?)?,
        params: serde_json::from_str(&params)
            .map_err(|e| DatabaseError::Query(format!("Invalid task params: {e}")))?,
        material_id: get_opt_string(row, 5)?,
        error_detail: get_opt_string(row, 6)?,
        attempt: get_u32(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        updated_at: parse_datetime(&row.get::<String>(9)?)?,
        started_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 11)?.as_deref())?,
    })
}

async fn require_task(conn: &libsql::Connection, id: &str) -> Result<Task, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM tasks WHERE id = ?1"), [id])
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Task.as_str(), id))?;
    row_to_task(&row)
}

async fn insert_task(
    conn: &libsql::Connection,
    topic_id: &str,
    kind: MaterialKind,
    params: serde_json::Value,
) -> Result<Task, DatabaseError> {
    require_topic(conn, topic_id).await?;

    let now = now_utc();
    let id = generate_id(conn, PREFIX_TASK).await?;
    conn.execute(
        "INSERT INTO tasks (id, topic_id, kind, status, params, attempt, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7)",
        libsql::params![
            id.as_str(),
            topic_id,
            kind.as_str(),
            TaskStatus::Pending.as_str(),
            params.to_string(),
            fmt_ts(&now),
            fmt_ts(&now)
        ],
    )
    .await?;

    append_audit(conn, EntityType::Task, &id, AuditAction::Created, None).await?;

    Ok(Task {
        id,
        topic_id: topic_id.to_string(),
        kind,
        status: TaskStatus::Pending,
        params,
        material_id: None,
        error_detail: None,
        attempt: 1,
        created_at: now,
        updated_at: now,
        started_at: None,
        completed_at: None,
    })
}

async fn apply_transition(
    conn: &libsql::Connection,
    task_id: &str,
    to: TaskStatus,
    payload: &StatusPayload,
) -> Result<Task, DatabaseError> {
    let current = require_task(conn, task_id).await?;
    let from = current.status;
    if !from.can_transition_to(to) {
        return Err(DatabaseError::InvalidTransition {
            entity_type: EntityType::Task.as_str().to_string(),
            id: task_id.to_string(),
            from: from.as_str().to_string(),
            to: to.as_str().to_string(),
        });
    }

    let now = fmt_ts(&now_utc());
    let mut reason = None;
    let (sql, params): (&str, Vec<libsql::Value>) = match to {
        TaskStatus::InProgress => (
            "UPDATE tasks SET status = ?1, started_at = ?2, updated_at = ?2
             WHERE id = ?3 AND status = ?4",
            vec![
                to.as_str().into(),
                now.into(),
                task_id.into(),
                from.as_str().into(),
            ],
        ),
        TaskStatus::Completed => {
            let storage_path = payload
                .storage_path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| {
                    DatabaseError::Validation(format!(
                        "completing task {task_id} requires a storage path"
                    ))
                })?;
            let material = record_completion_in(
                conn,
                Completion {
                    topic_id: &current.topic_id,
                    kind: current.kind,
                    storage_path,
                    format: payload.format,
                    task_id: Some(task_id),
                },
            )
            .await?;
            (
                "UPDATE tasks SET status = ?1, material_id = ?2, completed_at = ?3,
                     updated_at = ?3
                 WHERE id = ?4 AND status = ?5",
                vec![
                    to.as_str().into(),
                    material.id.into(),
                    now.into(),
                    task_id.into(),
                    from.as_str().into(),
                ],
            )
        }
        TaskStatus::Failed => {
            let detail = payload
                .error
                .clone()
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FAILURE.to_string());
            reason = Some(detail.clone());
            (
                "UPDATE tasks SET status = ?1, error_detail = ?2, updated_at = ?3
                 WHERE id = ?4 AND status = ?5",
                vec![
                    to.as_str().into(),
                    detail.into(),
                    now.into(),
                    task_id.into(),
                    from.as_str().into(),
                ],
            )
        }
        TaskStatus::Pending => (
            "UPDATE tasks SET status = ?1, error_detail = NULL, started_at = NULL,
                 completed_at = NULL, attempt = attempt + 1, updated_at = ?2
             WHERE id = ?3 AND status = ?4",
            vec![
                to.as_str().into(),
                now.into(),
                task_id.into(),
                from.as_str().into(),
            ],
        ),
    };

    let changed = conn.execute(sql, libsql::params_from_iter(params)).await?;
    if changed != 1 {
        warn!(task_id, %from, %to, "task status changed underneath transition");
        return Err(DatabaseError::Conflict(format!(
            "task {task_id} changed concurrently"
        )));
    }

    let detail = StatusChangedDetail {
        from: from.as_str().to_string(),
        to: to.as_str().to_string(),
        reason,
    };
    append_audit(
        conn,
        EntityType::Task,
        task_id,
        AuditAction::StatusChanged,
        Some(to_json(&detail)?),
    )
    .await?;

    require_task(conn, task_id).await
}

/// Filter criteria for task listings.
#[derive(Debug, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub kind: Option<MaterialKind>,
    pub topic_id: Option<String>,
    pub limit: Option<u32>,
}

impl LedgerService {
    /// Queue a generation task in `pending`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the topic does not exist.
    pub async fn create_task(
        &self,
        topic_id: &str,
        kind: MaterialKind,
        params: serde_json::Value,
    ) -> Result<Task, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = insert_task(&tx, topic_id, kind, params).await;
        let task = finish(tx, result).await?;

        debug!(task_id = %task.id, topic_id, %kind, "created task");
        Ok(task)
    }

    /// # Errors
    ///
    /// `NotFound` if no task has this id.
    pub async fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let conn = self.db().connect().await?;
        require_task(&conn, id).await
    }

    /// Move a task to `to`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the task does not exist.
    /// - `InvalidTransition` if the move is not allowed from the current status.
    /// - `Validation` when completing without a storage path.
    /// - `Conflict` if a concurrent writer changed the task first.
    ///
    /// Nothing is written on error.
    pub async fn update_status(
        &self,
        task_id: &str,
        to: TaskStatus,
        payload: StatusPayload,
    ) -> Result<Task, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_transition(&tx, task_id, to, &payload).await;
        let task = finish(tx, result).await?;

        debug!(task_id, status = %task.status, attempt = task.attempt, "task status changed");
        Ok(task)
    }

    /// Start work on a pending task.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition` unless the task is pending, or
    /// `Conflict` if another writer claimed it first.
    pub async fn claim_task(&self, task_id: &str) -> Result<Task, DatabaseError> {
        self.update_status(task_id, TaskStatus::InProgress, StatusPayload::default())
            .await
    }

    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition` unless the task is in progress,
    /// `Validation` when `payload` carries no storage path, or `Conflict`
    /// on a lost race.
    pub async fn complete_task(
        &self,
        task_id: &str,
        payload: StatusPayload,
    ) -> Result<Task, DatabaseError> {
        self.update_status(task_id, TaskStatus::Completed, payload)
            .await
    }

    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition` unless the task is in progress, or
    /// `Conflict` on a lost race.
    pub async fn fail_task(
        &self,
        task_id: &str,
        error: Option<&str>,
    ) -> Result<Task, DatabaseError> {
        let payload = StatusPayload {
            error: error.map(String::from),
            ..StatusPayload::default()
        };
        self.update_status(task_id, TaskStatus::Failed, payload).await
    }

    /// Requeue a failed task; the same record is reused with `attempt + 1`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `InvalidTransition` unless the task has failed, or
    /// `Conflict` on a lost race.
    pub async fn retry_task(&self, task_id: &str) -> Result<Task, DatabaseError> {
        self.update_status(task_id, TaskStatus::Pending, StatusPayload::default())
            .await
    }

    /// Open backlog (pending and in-progress), oldest first.
    ///
    /// Ties on `created_at` fall back to insertion order.
    pub async fn list_pending(&self) -> Result<Vec<Task>, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM tasks
                     WHERE status IN ({})
                     ORDER BY created_at ASC, rowid ASC",
                    open_status_list()
                ),
                (),
            )
            .await?;

        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    /// Tasks matching `filter`, newest first.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(status) = filter.status {
            params.push(libsql::Value::Text(status.as_str().to_string()));
            conditions.push(format!("status = ?{}", params.len()));
        }
        if let Some(kind) = filter.kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("kind = ?{}", params.len()));
        }
        if let Some(ref topic_id) = filter.topic_id {
            params.push(libsql::Value::Text(topic_id.clone()));
            conditions.push(format!("topic_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM tasks {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let conn = self.db().connect().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next().await? {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use lec_core::enums::OutputFormat;
    use lec_core::version::MaterialVersion;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::repos::audit::AuditFilter;
    use crate::test_support::helpers::{seed_topic, test_service};

    use super::*;

    #[tokio::test]
    async fn create_starts_pending() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({"depth": "intro"}))
            .await
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.attempt, 1);
        assert!(task.id.starts_with("tsk-"));
        assert_eq!(svc.get_task(&task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn create_for_missing_topic_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .create_task("top-00000000", MaterialKind::Quiz, json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn full_lifecycle_records_material() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();

        let claimed = svc.claim_task(&task.id).await.unwrap();
        assert_eq!(claimed.status, TaskStatus::InProgress);
        assert!(claimed.started_at.is_some());

        let done = svc
            .complete_task(&task.id, StatusPayload::completed("cs/bst.pdf"))
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.completed_at.is_some());

        let material = svc.get_current(&topic.id, MaterialKind::Notes).await.unwrap();
        assert_eq!(done.material_id.as_deref(), Some(material.id.as_str()));
        assert_eq!(material.version, MaterialVersion::INITIAL);
        assert_eq!(material.format, OutputFormat::Pdf);

        let history = svc.material_history(&material.id).await.unwrap();
        assert_eq!(history[0].task_id.as_deref(), Some(task.id.as_str()));
    }

    #[tokio::test]
    async fn completion_requires_storage_path() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Quiz, json!({}))
            .await
            .unwrap();
        svc.claim_task(&task.id).await.unwrap();

        let err = svc
            .complete_task(&task.id, StatusPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));

        let unchanged = svc.get_task(&task.id).await.unwrap();
        assert_eq!(unchanged.status, TaskStatus::InProgress);
        assert!(
            svc.get_current(&topic.id, MaterialKind::Quiz)
                .await
                .is_err()
        );
    }

    #[rstest]
    #[case::pending_to_completed(TaskStatus::Completed)]
    #[case::pending_to_failed(TaskStatus::Failed)]
    #[case::pending_to_pending(TaskStatus::Pending)]
    #[tokio::test]
    async fn illegal_moves_from_pending(#[case] to: TaskStatus) {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();

        let err = svc
            .update_status(&task.id, to, StatusPayload::completed("x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidTransition { .. }), "{err}");
        assert_eq!(svc.get_task(&task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn completed_is_terminal() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();
        svc.claim_task(&task.id).await.unwrap();
        svc.complete_task(&task.id, StatusPayload::completed("a.pdf"))
            .await
            .unwrap();

        for to in TaskStatus::ALL {
            let err = svc
                .update_status(&task.id, to, StatusPayload::completed("b.pdf"))
                .await
                .unwrap_err();
            assert!(matches!(err, DatabaseError::InvalidTransition { .. }));
        }
        let material = svc.get_current(&topic.id, MaterialKind::Notes).await.unwrap();
        assert_eq!(material.version, MaterialVersion::INITIAL);
    }

    #[tokio::test]
    async fn fail_then_retry_reuses_task() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Presentation, json!({}))
            .await
            .unwrap();
        svc.claim_task(&task.id).await.unwrap();

        let failed = svc
            .fail_task(&task.id, Some("renderer crashed"))
            .await
            .unwrap();
        assert_eq!(failed.status, TaskStatus::Failed);
        assert_eq!(failed.error_detail.as_deref(), Some("renderer crashed"));

        let retried = svc.retry_task(&task.id).await.unwrap();
        assert_eq!(retried.id, task.id);
        assert_eq!(retried.status, TaskStatus::Pending);
        assert_eq!(retried.attempt, 2);
        assert_eq!(retried.error_detail, None);
        assert_eq!(retried.started_at, None);
    }

    #[tokio::test]
    async fn failure_without_reason_uses_default() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Quiz, json!({}))
            .await
            .unwrap();
        svc.claim_task(&task.id).await.unwrap();
        let failed = svc.fail_task(&task.id, None).await.unwrap();
        assert_eq!(failed.error_detail.as_deref(), Some(DEFAULT_FAILURE));
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let svc = test_service().await;
        let err = svc.claim_task("tsk-00000000").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn pending_list_is_oldest_first_and_open_only() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let mut ids = Vec::new();
        for kind in [MaterialKind::Notes, MaterialKind::Quiz, MaterialKind::Presentation] {
            ids.push(svc.create_task(&topic.id, kind, json!({})).await.unwrap().id);
        }
        svc.claim_task(&ids[1]).await.unwrap();
        svc.claim_task(&ids[2]).await.unwrap();
        svc.fail_task(&ids[2], None).await.unwrap();

        let pending: Vec<_> = svc
            .list_pending()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(pending, vec![ids[0].clone(), ids[1].clone()]);
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let a = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();
        svc.create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();
        svc.claim_task(&a.id).await.unwrap();

        let in_progress = svc
            .list_tasks(&TaskFilter {
                status: Some(TaskStatus::InProgress),
                ..TaskFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, a.id);
    }

    #[tokio::test]
    async fn transitions_are_audited() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let task = svc
            .create_task(&topic.id, MaterialKind::Notes, json!({}))
            .await
            .unwrap();
        svc.claim_task(&task.id).await.unwrap();
        svc.fail_task(&task.id, Some("timeout")).await.unwrap();

        let entries = svc
            .query_audit(&AuditFilter {
                entity_id: Some(task.id.clone()),
                action: Some(AuditAction::StatusChanged),
                ..AuditFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(entries.len(), 2);
        let latest = entries[0].detail.as_ref().unwrap();
        assert_eq!(latest["to"], "failed");
        assert_eq!(latest["reason"], "timeout");
    }
}
