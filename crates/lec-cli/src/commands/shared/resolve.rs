//! Resolve user-supplied subject and topic keys to entities.

use lec_core::entities::{Subject, Topic};
use lec_core::errors::CoreError;
use lec_core::ids::{PREFIX_SUBJECT, PREFIX_TOPIC};
use lec_db::error::DatabaseError;
use lec_db::service::LedgerService;

/// A subject key is an ID (`sub-…`) or a slug.
///
/// Slugs such as `sub-2024` share the ID shape, so an ID-shaped key that
/// matches no ID is retried as a slug.
pub async fn resolve_subject(service: &LedgerService, key: &str) -> anyhow::Result<Subject> {
    let key = key.trim();
    if is_id(key, PREFIX_SUBJECT) {
        match service.get_subject(key).await {
            Err(DatabaseError::NotFound { .. }) => {}
            found => return Ok(found?),
        }
    }
    Ok(service.get_subject_by_slug(key).await?)
}

/// A topic key is `SUBJECT/TOPIC` using slugs, or else a topic ID (`top-…`).
pub async fn resolve_topic(service: &LedgerService, key: &str) -> anyhow::Result<Topic> {
    let key = key.trim();
    if let Some((subject_key, topic_key)) = key.split_once('/') {
        let subject = resolve_subject(service, subject_key).await?;
        return Ok(service.get_topic_by_slug(&subject.id, topic_key).await?);
    }
    if is_id(key, PREFIX_TOPIC) {
        return Ok(service.get_topic(key).await?);
    }
    Err(CoreError::Validation(format!(
        "invalid topic '{key}': expected a topic ID or SUBJECT/TOPIC"
    ))
    .into())
}

fn is_id(key: &str, prefix: &str) -> bool {
    key.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
