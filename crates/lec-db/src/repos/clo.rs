//! Course learning outcomes attached to topics.

use lec_core::entities::Clo;
use lec_core::enums::{AuditAction, BloomLevel, EntityType};
use lec_core::ids::PREFIX_CLO;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{fmt_ts, get_opt_string, now_utc, parse_datetime, parse_enum};
use crate::repos::audit::append_audit;
use crate::repos::topic::require_topic;
use crate::service::LedgerService;
use crate::{finish, generate_id};

const SELECT_COLS: &str = "id, topic_id, text, bloom_level, created_at";

fn row_to_clo(row: &libsql::Row) -> Result<Clo, DatabaseError> {
    Ok(Clo {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        text: row.get(2)?,
        bloom_level: get_opt_string(row, 3)?
            .as_deref()
            .map(parse_enum::<BloomLevel>)
            .transpose()?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

async fn insert_clo(
    conn: &libsql::Connection,
    topic_id: &str,
    text: &str,
    bloom_level: Option<BloomLevel>,
) -> Result<Clo, DatabaseError> {
    require_topic(conn, topic_id).await?;

    let now = now_utc();
    let id = generate_id(conn, PREFIX_CLO).await?;
    conn.execute(
        &format!("INSERT INTO clos ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5)"),
        libsql::params![
            id.as_str(),
            topic_id,
            text,
            bloom_level.map(BloomLevel::as_str),
            fmt_ts(&now)
        ],
    )
    .await?;

    append_audit(conn, EntityType::Clo, &id, AuditAction::Created, None).await?;

    Ok(Clo {
        id,
        topic_id: topic_id.to_string(),
        text: text.to_string(),
        bloom_level,
        created_at: now,
    })
}

impl LedgerService {
    /// Attach a learning outcome to a topic.
    ///
    /// When `bloom_level` is not given it is inferred from the statement's
    /// leading action verb, and left empty if the verb is not recognised.
    ///
    /// # Errors
    ///
    /// `NotFound` if the topic does not exist, `Validation` for blank text.
    pub async fn add_clo(
        &self,
        topic_id: &str,
        text: &str,
        bloom_level: Option<BloomLevel>,
    ) -> Result<Clo, DatabaseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DatabaseError::Validation(
                "learning outcome text must not be empty".into(),
            ));
        }
        let bloom_level = bloom_level.or_else(|| BloomLevel::infer(text));

        let tx = self.db().begin_write().await?;
        let result = insert_clo(&tx, topic_id, text, bloom_level).await;
        let clo = finish(tx, result).await?;

        debug!(clo_id = %clo.id, topic_id, "added learning outcome");
        Ok(clo)
    }

    pub async fn list_clos(&self, topic_id: &str) -> Result<Vec<Clo>, DatabaseError> {
        let conn = self.db().connect().await?;
        require_topic(&conn, topic_id).await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM clos WHERE topic_id = ?1
                     ORDER BY created_at, rowid"
                ),
                [topic_id],
            )
            .await?;

        let mut clos = Vec::new();
        while let Some(row) = rows.next().await? {
            clos.push(row_to_clo(&row)?);
        }
        Ok(clos)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{seed_topic, test_service};

    use super::*;

    #[tokio::test]
    async fn infers_bloom_level() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let clo = svc
            .add_clo(&topic.id, "Analyze the height of a degenerate tree", None)
            .await
            .unwrap();
        assert_eq!(clo.bloom_level, Some(BloomLevel::Analyze));

        let explicit = svc
            .add_clo(&topic.id, "Trees in practice", Some(BloomLevel::Apply))
            .await
            .unwrap();
        assert_eq!(explicit.bloom_level, Some(BloomLevel::Apply));

        let listed = svc.list_clos(&topic.id).await.unwrap();
        assert_eq!(listed, vec![clo, explicit]);
    }

    #[tokio::test]
    async fn unknown_verb_leaves_level_empty() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let clo = svc
            .add_clo(&topic.id, "Trees are everywhere", None)
            .await
            .unwrap();
        assert_eq!(clo.bloom_level, None);
        assert_eq!(svc.list_clos(&topic.id).await.unwrap()[0].bloom_level, None);
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let svc = test_service().await;
        let topic = seed_topic(&svc).await;
        let err = svc.add_clo(&topic.id, "   ", None).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_topic_is_not_found() {
        let svc = test_service().await;
        let err = svc
            .add_clo("top-00000000", "Define a tree", None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
