//! Topic repository. Slugs are unique within their subject.

use lec_core::audit_detail::RegisteredDetail;
use lec_core::entities::Topic;
use lec_core::enums::{AuditAction, EntityType};
use lec_core::ids::PREFIX_TOPIC;
use lec_core::slug::{derive_slug, sanitize};
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{fmt_ts, get_opt_string, now_utc, parse_datetime, to_json, unique_conflict};
use crate::repos::audit::append_audit;
use crate::repos::subject::require_subject;
use crate::service::LedgerService;
use crate::updates::topic::TopicUpdate;
use crate::{finish, generate_id};

const SELECT_COLS: &str = "id, subject_id, name, slug, description, created_at, updated_at";

fn row_to_topic(row: &libsql::Row) -> Result<Topic, DatabaseError> {
    Ok(Topic {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        description: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

pub(crate) async fn fetch_topic(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Option<Topic>, DatabaseError> {
    let mut rows = conn
        .query(&format!("SELECT {SELECT_COLS} FROM topics WHERE id = ?1"), [id])
        .await?;
    rows.next().await?.map(|row| row_to_topic(&row)).transpose()
}

async fn fetch_topic_by_slug(
    conn: &libsql::Connection,
    subject_id: &str,
    slug: &str,
) -> Result<Option<Topic>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SELECT_COLS} FROM topics WHERE subject_id = ?1 AND slug = ?2"),
            [subject_id, slug],
        )
        .await?;
    rows.next().await?.map(|row| row_to_topic(&row)).transpose()
}

pub(crate) async fn require_topic(
    conn: &libsql::Connection,
    id: &str,
) -> Result<Topic, DatabaseError> {
    fetch_topic(conn, id)
        .await?
        .ok_or_else(|| DatabaseError::not_found(EntityType::Topic.as_str(), id))
}

fn slug_taken(subject_id: &str, slug: &str) -> String {
    format!("topic slug '{slug}' already exists in subject {subject_id}")
}

async fn insert_topic(
    conn: &libsql::Connection,
    subject_id: &str,
    name: &str,
    slug: &str,
    description: Option<&str>,
) -> Result<Topic, DatabaseError> {
    require_subject(conn, subject_id).await?;
    if fetch_topic_by_slug(conn, subject_id, slug).await?.is_some() {
        return Err(DatabaseError::Conflict(slug_taken(subject_id, slug)));
    }

    let now = now_utc();
    let id = generate_id(conn, PREFIX_TOPIC).await?;
    conn.execute(
        &format!("INSERT INTO topics ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        libsql::params![
            id.as_str(),
            subject_id,
            name,
            slug,
            description,
            fmt_ts(&now),
            fmt_ts(&now)
        ],
    )
    .await
    .map_err(|e| unique_conflict(e, || slug_taken(subject_id, slug)))?;

    let detail = RegisteredDetail {
        name: name.to_string(),
        slug: slug.to_string(),
    };
    append_audit(
        conn,
        EntityType::Topic,
        &id,
        AuditAction::Created,
        Some(to_json(&detail)?),
    )
    .await?;

    Ok(Topic {
        id,
        subject_id: subject_id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: description.map(String::from),
        created_at: now,
        updated_at: now,
    })
}

async fn apply_topic_update(
    conn: &libsql::Connection,
    id: &str,
    update: &TopicUpdate,
) -> Result<Topic, DatabaseError> {
    let current = require_topic(conn, id).await?;
    if update.is_empty() {
        return Ok(current);
    }

    let mut sets = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();

    if let Some(ref name) = update.name {
        let name = name.trim();
        let slug = derive_slug(name)?;
        if slug != current.slug
            && fetch_topic_by_slug(conn, &current.subject_id, &slug)
                .await?
                .is_some()
        {
            return Err(DatabaseError::Conflict(slug_taken(&current.subject_id, &slug)));
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
        "UPDATE topics SET {} WHERE id = ?{}",
        sets.join(", "),
        params.len()
    );
    conn.execute(&sql, libsql::params_from_iter(params))
        .await
        .map_err(|e| unique_conflict(e, || format!("topic {id} rename collides")))?;

    append_audit(
        conn,
        EntityType::Topic,
        id,
        AuditAction::Updated,
        Some(to_json(update)?),
    )
    .await?;

    require_topic(conn, id).await
}

async fn remove_topic(conn: &libsql::Connection, id: &str) -> Result<Topic, DatabaseError> {
    let topic = require_topic(conn, id).await?;
    conn.execute("DELETE FROM topics WHERE id = ?1", [id]).await?;

    let detail = RegisteredDetail {
        name: topic.name.clone(),
        slug: topic.slug.clone(),
    };
    append_audit(
        conn,
        EntityType::Topic,
        id,
        AuditAction::Deleted,
        Some(to_json(&detail)?),
    )
    .await?;
    Ok(topic)
}

impl LedgerService {
    /// Register a topic inside a subject.
    ///
    /// # Errors
    ///
    /// `NotFound` if the subject does not exist, `InvalidName` for an empty
    /// slug, `Conflict` if the subject already has a topic with this slug.
    pub async fn register_topic(
        &self,
        subject_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Topic, DatabaseError> {
        let name = name.trim();
        let slug = derive_slug(name)?;

        let tx = self.db().begin_write().await?;
        let result = insert_topic(&tx, subject_id, name, &slug, description).await;
        let topic = finish(tx, result).await?;

        debug!(topic_id = %topic.id, subject_id, slug = %topic.slug, "registered topic");
        Ok(topic)
    }

    pub async fn get_topic(&self, id: &str) -> Result<Topic, DatabaseError> {
        let conn = self.db().connect().await?;
        require_topic(&conn, id).await
    }

    pub async fn get_topic_by_slug(
        &self,
        subject_id: &str,
        key: &str,
    ) -> Result<Topic, DatabaseError> {
        let slug = sanitize(key);
        let conn = self.db().connect().await?;
        fetch_topic_by_slug(&conn, subject_id, &slug)
            .await?
            .ok_or_else(|| {
                DatabaseError::not_found(EntityType::Topic.as_str(), format!("{subject_id}/{slug}"))
            })
    }

    /// Topics of one subject ordered by slug.
    pub async fn list_topics(
        &self,
        subject_id: &str,
        limit: u32,
    ) -> Result<Vec<Topic>, DatabaseError> {
        let conn = self.db().connect().await?;
        require_subject(&conn, subject_id).await?;
        let mut rows = conn
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM topics WHERE subject_id = ?1
                     ORDER BY slug LIMIT {limit}"
                ),
                [subject_id],
            )
            .await?;

        let mut topics = Vec::new();
        while let Some(row) = rows.next().await? {
            topics.push(row_to_topic(&row)?);
        }
        Ok(topics)
    }

    pub async fn update_topic(&self, id: &str, update: TopicUpdate) -> Result<Topic, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = apply_topic_update(&tx, id, &update).await;
        let topic = finish(tx, result).await?;

        debug!(topic_id = %topic.id, slug = %topic.slug, "updated topic");
        Ok(topic)
    }

    /// Delete a topic with its materials, tasks and outcomes.
    pub async fn delete_topic(&self, id: &str) -> Result<Topic, DatabaseError> {
        let tx = self.db().begin_write().await?;
        let result = remove_topic(&tx, id).await;
        let topic = finish(tx, result).await?;

        debug!(topic_id = %topic.id, "deleted topic");
        Ok(topic)
    }
}
