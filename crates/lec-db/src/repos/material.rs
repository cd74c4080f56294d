//! Material version manager.
//!
//! One material row per (topic, kind). Each recorded completion either
//! creates it at `v1.0` or bumps the minor version, and appends a revision
//! row so the full history stays queryable.

use lec_core::audit_detail::VersionRecordedDetail;
use lec_core::entities::{Material, MaterialRevision};
use lec_core::enums::{AuditAction, EntityType, MaterialKind, OutputFormat};
use lec_core::ids::PREFIX_MATERIAL;
use lec_core::version::MaterialVersion;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{
    fmt_ts, get_opt_string, get_u32, now_utc, parse_datetime, parse_enum, to_json, unique_conflict,
};
use crate::repos::audit::append_audit;
use crate::repos::topic::require_topic;
use crate::service::LedgerService;
use crate::{finish, generate_id};

const SELECT_COLS: &str = "id, topic_id, kind, format, version_major, version_minor, \
                           storage_path, created_at, updated_at";

fn row_to_material(row: &libsql::Row) -> Result<Material, DatabaseError> {
    Ok(Material {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        kind: parse_enum(&row.get::<String>(2)?)?,
        format: parse_enum(&row.get::<String>(3)?)?,
        version: MaterialVersion::new(get_u32(row, 4)?, get_u32(row, 5)?),
        storage_path: row.get(6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn row_to_revision(row: &libsql::Row) -> Result<MaterialRevision, DatabaseError> {
    Ok(MaterialRevision {
        material_id: row.get(0)?,
        version: MaterialVersion::new(get_u32(row, 1)?, get_u32(row, 2)?),
        storage_path: row.get(3)?,
        task_id: get_opt_string(row, 4)?,
        recorded_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

async fn fetch_current(
    conn: &libsql::Connection,
    topic_id: &str,
    kind: MaterialKind,
) -> Result<Option<Material>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM materials WHERE topic_id = ?1 AND kind = ?2"),
            [topic_id, kind.as_str()],
        )
        .await?;
    rows.next().await?.map(|row| row_to_material(&row)).transpose()
}

/// What a completion reports to the version manager.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub topic_id: &'a str,
    pub kind: MaterialKind,
    pub storage_path: &'a str,
    /// Reported format; when absent it is inferred from the path extension,
    /// else the kind's default.
    pub format: Option<OutputFormat>,
    pub task_id: Option<&'a str>,
}

impl Completion<'_> {
    #[must_use]
    pub fn resolved_format(&self) -> OutputFormat {
        self.format
            .or_else(|| OutputFormat::from_path(self.storage_path))
            .unwrap_or_else(|| self.kind.default_format())
    }
}

/// Create or bump the material for `(topic, kind)` on `conn`.
///
/// Runs inside the caller's write transaction so a task completion and its
/// version bump commit together.
pub(crate) async fn record_completion_in(
    conn: &libsql::Connection,
    completion: Completion<'_>,
) -> Result<Material, DatabaseError> {
    let format = completion.resolved_format();
    let Completion {
        topic_id,
        kind,
        storage_path,
        task_id,
        ..
    } = completion;
    if storage_path.trim().is_empty() {
        return Err(DatabaseError::Validation(
            "storage path must not be empty".into(),
        ));
    }
    require_topic(conn, topic_id).await?;

    let now = now_utc();
    let material = match fetch_current(conn, topic_id, kind).await? {
        None => {
            let id = generate_id(conn, PREFIX_MATERIAL).await?;
            let version = MaterialVersion::INITIAL;
            conn.execute(
                &format!(
                    "INSERT INTO materials ({SELECT_COLS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                libsql::params![
                    id.as_str(),
                    topic_id,
                    kind.as_str(),
                    format.as_str(),
                    i64::from(version.major),
                    i64::from(version.minor),
                    storage_path,
                    fmt_ts(&now),
                    fmt_ts(&now)
                ],
            )
            .await
            .map_err(|e| {
                unique_conflict(e, || format!("{kind} material for topic {topic_id} already exists"))
            })?;
            Material {
                id,
                topic_id: topic_id.to_string(),
                kind,
                format,
                version,
                storage_path: storage_path.to_string(),
                created_at: now,
                updated_at: now,
            }
        }
        Some(current) => {
            let version = current.version.next_minor();
            // Compare-and-set on the version we read.
            let changed = conn
                .execute(
                    "UPDATE materials
                     SET version_major = ?1, version_minor = ?2, storage_path = ?3,
                         format = ?4, updated_at = ?5
                     WHERE id = ?6 AND version_major = ?7 AND version_minor = ?8",
                    libsql::params![
                        i64::from(version.major),
                        i64::from(version.minor),
                        storage_path,
                        format.as_str(),
                        fmt_ts(&now),
                        current.id.as_str(),
                        i64::from(current.version.major),
                        i64::from(current.version.minor)
                    ],
                )
                .await?;
            if changed != 1 {
                return Err(DatabaseError::Conflict(format!(
                    "material {} changed concurrently",
                    current.id
                )));
            }
            Material {
                version,
                format,
                storage_path: storage_path.to_string(),
                updated_at: now,
                ..current
            }
        }
    };

    conn.execute(
        "INSERT INTO material_revisions
         (material_id, version_major, version_minor, storage_path, task_id, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            material.id.as_str(),
            i64::from(material.version.major),
            i64::from(material.version.minor),
            storage_path,
            task_id,
            fmt_ts(&now)
        ],
    )
    .await
    .map_err(|e| {
        unique_conflict(e, || {
            format!("material {} already has {}", material.id, material.version)
        })
    })?;

    let detail = VersionRecordedDetail {
        version: material.version,
        storage_path: storage_path.to_string(),
        task_id: task_id.map(String::from),
    };
    append_audit(
        conn,
        EntityType::Material,
        &material.id,
        AuditAction::VersionRecorded,
        Some(to_json(&detail)?),
    )
    .await?;

    Ok(material)
}

/// Filter criteria for material listings.
#[derive(Debug, Default)]
pub struct MaterialFilter {
    pub topic_id: Option<String>,
    pub kind: Option<MaterialKind>,
    pub limit: Option<u32>,
}

impl LedgerService {
    /// Record a produced material outside of a task.
    ///
    /// # Errors
    ///
    /// `NotFound` if the topic does not exist, `Validation` for an empty path.
    pub async fn record_completion(
        &self,
        completion: Completion<'_>,
    ) -> Result<Material, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = record_completion_in(&tx, completion).await;
        let material = finish(tx, result).await?;

        debug!(
            material_id = %material.id,
            version = %material.version,
            "recorded material version"
        );
        Ok(material)
    }

    /// The current material for `(topic, kind)`.
    pub async fn get_current(
        &self,
        topic_id: &str,
        kind: MaterialKind,
    ) -> Result<Material, DatabaseError> {
        let conn = self.db().connect().await?;
        fetch_current(&conn, topic_id, kind).await?.ok_or_else(|| {
            DatabaseError::not_found(EntityType::Material.as_str(), format!("{topic_id}/{kind}"))
        })
    }

    pub async fn get_material(&self, id: &str) -> Result<Material, DatabaseError> {
        let conn = self.db().connect().await?;
        let mut rows = conn
            .query(&format!("SELECT {SELECT_COLS} FROM materials WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Material.as_str(), id))?;
        row_to_material(&row)
    }

    pub async fn list_materials(
        &self,
        filter: &MaterialFilter,
    ) -> Result<Vec<Material>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref topic_id) = filter.topic_id {
            params.push(libsql::Value::Text(topic_id.clone()));
            conditions.push(format!("topic_id = ?{}", params.len()));
        }
        if let Some(kind) = filter.kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("kind = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM materials {where_clause}
             ORDER BY updated_at DESC, rowid DESC LIMIT {limit}"
        );

        let conn = self.db().connect().await?;
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut materials = Vec::new();
        while let Some(row) = rows.next().await? {
            materials.push(row_to_material(&row)?);
        }
        Ok(materials)
    }

    /// Every recorded version of a material, oldest first.
    pub async fn material_history(
        &self,
        material_id: &str,
    ) -> Result<Vec<MaterialRevision>, DatabaseError> {
        // Resolve the material first so an unknown id is NotFound, not empty.
        self.get_material(material_id).await?;

        let conn = self.db().connect().await?;
        let mut rows = conn
            .query(
                "SELECT material_id, version_major, version_minor, storage_path, task_id, recorded_at
                 FROM material_revisions WHERE material_id = ?1
                 ORDER BY version_major, version_minor",
                [material_id],
            )
            .await?;
        let mut revisions = Vec::new();
        while let Some(row) = rows.next().await? {
            revisions.push(row_to_revision(&row)?);
        }
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{seed_topic, test_service};

    use super::*;

    fn notes<'a>(topic_id: &'a str, path: &'a str) -> Completion<'a> {
        Completion {
            topic_id,
            kind: MaterialKind::Notes,
            storage_path: path,
            format: Some(OutputFormat::Pdf),
            task_id: None,
        }
    }

    #[tokio::test]
    async fn first_completion_creates_v1_0() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let material = svc
            .record_completion(notes(&topic.id, "cs/bst.pdf"))
            .await
            .unwrap();
        assert_eq!(material.version, MaterialVersion::INITIAL);
        assert_eq!(material.version.to_string(), "v1.0");
        assert!(material.id.starts_with("mat-"));
        assert_eq!(svc.get_current(&topic.id, MaterialKind::Notes).await.unwrap(), material);
    }

    #[tokio::test]
    async fn completions_bump_minor() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let mut versions = Vec::new();
        for n in 0..3 {
            let path = format!("cs/bst-{n}.pdf");
            let material = svc.record_completion(notes(&topic.id, &path)).await.unwrap();
            versions.push(material.version.to_string());
        }
        assert_eq!(versions, vec!["v1.0", "v1.1", "v1.2"]);

        let current = svc.get_current(&topic.id, MaterialKind::Notes).await.unwrap();
        assert_eq!(current.storage_path, "cs/bst-2.pdf");

        let history = svc.material_history(&current.id).await.unwrap();
        let paths: Vec<_> = history.iter().map(|r| r.storage_path.as_str()).collect();
        assert_eq!(paths, vec!["cs/bst-0.pdf", "cs/bst-1.pdf", "cs/bst-2.pdf"]);
    }

    #[tokio::test]
    async fn kinds_version_independently() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        svc.record_completion(notes(&topic.id, "a.pdf")).await.unwrap();
        svc.record_completion(notes(&topic.id, "b.pdf")).await.unwrap();
        let quiz = svc
            .record_completion(Completion {
                kind: MaterialKind::Quiz,
                format: None,
                ..notes(&topic.id, "q.docx")
            })
            .await
            .unwrap();
        assert_eq!(quiz.version, MaterialVersion::INITIAL);
        assert_eq!(quiz.format, OutputFormat::Docx);

        let all = svc
            .list_materials(&MaterialFilter {
                topic_id: Some(topic.id.clone()),
                ..MaterialFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn format_falls_back_to_extension_then_kind() {
        let reported = notes("t", "out/a.pdf");
        assert_eq!(
            Completion { format: Some(OutputFormat::Md), ..reported }.resolved_format(),
            OutputFormat::Md
        );
        assert_eq!(
            Completion { format: None, ..notes("t", "deck.pptx") }.resolved_format(),
            OutputFormat::Pptx
        );
        assert_eq!(
            Completion {
                kind: MaterialKind::Quiz,
                format: None,
                ..notes("t", "blob/quiz-7")
            }
            .resolved_format(),
            OutputFormat::Docx
        );
    }

    #[tokio::test]
    async fn unknown_topic_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .record_completion(notes("top-00000000", "x.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn get_current_without_material_is_not_found() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let err = svc
            .get_current(&topic.id, MaterialKind::Presentation)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[tokio::test]
    async fn history_of_unknown_material_is_not_found() {
        let svc = test_service().await;
        assert!(matches!(
            svc.material_history("mat-00000000").await.unwrap_err(),
            DatabaseError::NotFound { .. }
        ));
    }
}
