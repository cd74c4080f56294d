//! Subject repository: registration, lookup, rename, delete, rollup.

use std::collections::BTreeMap;

use lec_core::audit_detail::RegisteredDetail;
use lec_core::entities::Subject;
use lec_core::enums::{AuditAction, EntityType, MaterialKind};
use lec_core::ids::PREFIX_SUBJECT;
use lec_core::responses::SubjectStats;
use lec_core::slug::{derive_slug, sanitize};
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{
    fmt_ts, get_count, get_opt_string, now_utc, open_status_list, parse_datetime, to_json,
    unique_conflict,
};
use crate::repos::audit::append_audit;
use crate::service::LedgerService;
use crate::updates::subject::SubjectUpdate;
use crate::{finish, generate_id};

const SELECT_COLS: &str = "id, name, slug, description, created_at, updated_at";

fn row_to_subject(row: &libsql::Row) -> Result<Subject, DatabaseError> {
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

pub(crate) async fn fetch_subject(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Subject>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM subjects WHERE id = ?1"),
            [id],
        )
        .await?;
    rows.next().await?.map(|row| row_to_subject(&row)).transpose()
}

async fn fetch_subject_by_slug(
    conn: &libsql::Connection,
    slug: &str,
) -> Result<Option<Subject>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM subjects WHERE slug = ?1"),
            [slug],
        )
        .await?;
    rows.next().await?.map(|row| row_to_subject(&row)).transpose()
}

pub(crate) async fn require_subject(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Subject, DatabaseError> {
    fetch_subject(conn, id)
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Subject.as_str(), id))
}

fn slug_taken(slug: &str) -> String {
    format!("subject slug '{slug}' already exists")
}

async fn insert_subject(
    conn: &libsql::Connection,
    name: &str,
    slug: &str,
    description: Option<&str>,
) -> Result<Subject, DatabaseError> {
    if fetch_subject_by_slug(conn, slug).await?.is_some() {
        return Err(DatabaseError::Conflict(slug_taken(slug)));
    }

    let now = now_utc();
    let id = generate_id(conn, PREFIX_SUBJECT).await?;
    conn.execute(
        &format!("INSERT INTO subjects ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        libsql::params![id.as_str(), name, slug, description, fmt_ts(&now), fmt_ts(&now)],
    )
    .await
    .map_err(|e| unique_conflict(e, || slug_taken(slug)))?;

    let detail = RegisteredDetail {
        name: name.to_string(),
        slug: slug.to_string(),
    };
    append_audit(
        conn,
        EntityType::Subject,
        &id,
        AuditAction::Created,
        Some(to_json(&detail)?),
    )
    .await?;

    Ok(Subject {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.map(String::from),
        created_at: now,
        updated_at: now,
    })
}

async fn apply_subject_update(
    conn: &libsql::Connection,
    id: &str,
    update: &SubjectUpdate,
) -> Result<Subject, DatabaseError> {
    let current = require_subject(conn, id).await?;
    if update.is_empty() {
        return Ok(current);
    }

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(ref name) = update.name {
        let name = name.trim();
        let slug = derive_slug(name)?;
        if slug != current.slug && fetch_subject_by_slug(conn, &slug).await?.is_some() {
            return Err(DatabaseError::Conflict(slug_taken(&slug)));
        }
        params.push(name.to_string().into());
        sets.push(format!("name = ?{}", params.len()));
        params.push(slug.into());
        sets.push(format!("slug = ?{}", params.len()));
    }
    if let Some(ref description) = update.description {
        params.push(description.clone().map_or(libsql::Value::Null, Into::into));
        sets.push(format!("description = ?{}", params.len()));
    }

    params.push(fmt_ts(&now_utc()).into());
    sets.push(format!("updated_at = ?{}", params.len()));
    params.push(id.into());
    let sql = format!(
        "UPDATE subjects SET {} WHERE id = ?{}",
        sets.join(", "),
        params.len()
    );
    conn.execute(&sql, libsql::params_from_iter(params))
        .await
        .map_err(|e| unique_conflict(e, || format!("subject {id} rename collides")))?;

    append_audit(
        conn,
        EntityType::Subject,
        id,
        AuditAction::Updated,
        Some(to_json(update)?),
    )
    .await?;

    require_subject(conn, id).await
}

async fn remove_subject(conn: &libsql::Connection, id: &str) -> Result<Subject, DatabaseError> {
    let subject = require_subject(conn, id).await?;
    conn.execute("DELETE FROM subjects WHERE id = ?1", [id]).await?;

    let detail = RegisteredDetail {
        name: subject.name.clone(),
        slug: subject.slug.clone(),
    };
    append_audit(
        conn,
        EntityType::Subject,
        id,
        AuditAction::Deleted,
        Some(to_json(&detail)?),
    )
    .await?;
    Ok(subject)
}

impl LedgerService {
    /// Register a subject under the slug derived from `name`.
    ///
    /// # Errors
    ///
    /// `InvalidName` if the name has no slug characters, `Conflict` if the
    /// slug is already registered.
    pub async fn register_subject(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Subject, DatabaseError> {
        let name = name.trim();
        let slug = derive_slug(name)?;

        let tx = self.db().begin_write().await?;
        let result = insert_subject(&tx, name, &slug, description).await;
        let subject = finish(tx, result).await?;

        debug!(subject_id = %subject.id, slug = %subject.slug, "registered subject");
        Ok(subject)
    }

    pub async fn get_subject(&self, id: &str) -> Result<Subject, DatabaseError> {
        let conn = self.db().connect().await?;
        require_subject(&conn, id).await
    }

    /// Look a subject up by slug. The key is sanitized first, so a display
    /// name works too.
    pub async fn get_subject_by_slug(&self, key: &str) -> Result<Subject, DatabaseError> {
        let slug = sanitize(key);
        let conn = self.db().connect().await?;
        fetch_subject_by_slug(&conn, &slug)
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Subject.as_str(), slug))
    }

    pub async fn list_subjects(&self, limit: u32) -> Result<Vec<Subject>, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn
            .query(
                &format!("SELECT {SELECT_COLS} FROM subjects ORDER BY slug LIMIT {limit}"),
                (),
            )
            .await?;

        let mut subjects = Vec::new();
        while let Some(row) = rows.next().await? {
            subjects.push(row_to_subject(&row)?);
        }
        Ok(subjects)
    }

    /// Rename a subject and/or change its description.
    ///
    /// A new name re-derives the slug under the same uniqueness rule as
    /// registration.
    pub async fn update_subject(
        &self,
        id: &str,
        update: SubjectUpdate,
    ) -> Result<Subject, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_subject_update(&tx, id, &update).await;
        let subject = finish(tx, result).await?;

        debug!(subject_id = %subject.id, slug = %subject.slug, "updated subject");
        Ok(subject)
    }

    /// Delete a subject together with its topics and everything under them.
    pub async fn delete_subject(&self, id: &str) -> Result<Subject, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = remove_subject(&tx, id).await;
        let subject = finish(tx, result).await?;

        debug!(subject_id = %subject.id, "deleted subject");
        Ok(subject)
    }

    /// Topic count, current materials per kind, and open tasks for a subject.
    pub async fn subject_stats(&self, id: &str) -> Result<SubjectStats, DatabaseError> {
        let tx = self.db().begin_read().await?;
        let result = read_subject_stats(&tx, id).await;
        finish(tx, result).await
    }
}

async fn read_subject_stats(
    conn: &libsql::Connection,
    id: &str,
) -> Result<SubjectStats, DatabaseError> {
    require_subject(conn, id).await?;

    let mut rows = conn
        .query("SELECT COUNT(*) FROM topics WHERE subject_id = ?1", [id])
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let topic_count = get_count(&row, 0)?;

    let mut materials_by_kind: BTreeMap<String, u64> = MaterialKind::ALL
        .iter()
        .map(|k| (k.as_str().to_string(), 0))
        .collect();
    let mut rows = conn
        .query(
            "SELECT m.kind, COUNT(*) FROM materials m
             JOIN topics t ON t.id = m.topic_id
             WHERE t.subject_id = ?1
             GROUP BY m.kind",
            [id],
        )
        .await?;
    while let Some(row) = rows.next().await? {
        materials_by_kind.insert(row.get::<String>(0)?, get_count(&row, 1)?);
    }

    let mut rows = conn
        .query(
            &format!(
                "SELECT COUNT(*) FROM tasks k
                 JOIN topics t ON t.id = k.topic_id
                 WHERE t.subject_id = ?1 AND k.status IN ({})",
                open_status_list()
            ),
            [id],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    let open_tasks = get_count(&row, 0)?;

    Ok(SubjectStats {
        subject_id: id.to_string(),
        topic_count,
        materials_by_kind,
        open_tasks,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{seed_topic, test_service};
    use crate::updates::subject::SubjectUpdateBuilder;

    use super::*;

    #[tokio::test]
    async fn register_derives_slug() {
        let svc = test_service().await;
        let subject = svc
            .register_subject("Organic Chemistry", Some("Carbon compounds"))
            .await
            .unwrap();
        assert_eq!(subject.slug, "organic-chemistry");
        assert!(subject.id.starts_with("sub-"));
        assert_eq!(subject.description.as_deref(), Some("Carbon compounds"));

        let fetched = svc.get_subject(&subject.id).await.unwrap();
        assert_eq!(fetched, subject);
    }

    #[tokio::test]
    async fn duplicate_slug_conflicts() {
        let svc = test_service().await;
        svc.register_subject("Organic Chemistry", None).await.unwrap();
        let err = svc
            .register_subject("organic   CHEMISTRY!", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)), "{err}");
    }

    #[tokio::test]
    async fn empty_slug_is_invalid_name() {
        let svc = test_service().await;
        let err = svc.register_subject("@@@", None).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidName(_)));
        assert!(svc.list_subjects(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_by_slug_sanitizes_key() {
        let svc = test_service().await;
        let subject = svc.register_subject("Data Structures", None).await.unwrap();
        let by_slug = svc.get_subject_by_slug("data-structures").await.unwrap();
        let by_name = svc.get_subject_by_slug("Data Structures").await.unwrap();
        assert_eq!(by_slug.id, subject.id);
        assert_eq!(by_name.id, subject.id);

        let missing = svc.get_subject_by_slug("nope").await.unwrap_err();
        assert!(matches!(missing, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_orders_by_slug() {
        let svc = test_service().await;
        svc.register_subject("Zoology", None).await.unwrap();
        svc.register_subject("Algebra", None).await.unwrap();
        let slugs: Vec<_> = svc
            .list_subjects(10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        assert_eq!(slugs, vec!["algebra", "zoology"]);
    }

    #[tokio::test]
    async fn rename_rederives_slug() {
        let svc = test_service().await;
        let subject = svc.register_subject("Chem", None).await.unwrap();
        let renamed = svc
            .update_subject(
                &subject.id,
                SubjectUpdateBuilder::new().name("Organic Chemistry").build(),
            )
            .await
            .unwrap();
        assert_eq!(renamed.slug, "organic-chemistry");
        assert_eq!(renamed.name, "Organic Chemistry");
        assert!(renamed.updated_at >= subject.updated_at);
    }

    #[tokio::test]
    async fn rename_onto_existing_slug_conflicts() {
        let svc = test_service().await;
        svc.register_subject("Physics", None).await.unwrap();
        let other = svc.register_subject("Chemistry", None).await.unwrap();
        let err = svc
            .update_subject(&other.id, SubjectUpdateBuilder::new().name("PHYSICS").build())
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(svc.get_subject(&other.id).await.unwrap().slug, "chemistry");
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let svc = test_service().await;
        let err = svc.delete_subject("sub-00000000").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn stats_count_topics_and_open_tasks() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        svc.register_topic(&topic.subject_id, "Heaps", None)
            .await
            .unwrap();
        svc.create_task(&topic.id, MaterialKind::Quiz, serde_json::json!({}))
            .await
            .unwrap();

        let stats = svc.subject_stats(&topic.subject_id).await.unwrap();
        assert_eq!(stats.topic_count, 2);
        assert_eq!(stats.open_tasks, 1);
        assert_eq!(stats.materials_by_kind.get("notes"), Some(&0));
    }
}
