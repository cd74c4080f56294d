//! Slug derivation for subject and topic names.
//!
//! ```text
//! "Data Structures and Algorithms"       -> "data-structures-and-algorithms"
//! "The French Revolution (1789-1799)"    -> "the-french-revolution-1789-1799"
//! "Alkene Reactions & Mechanisms"        -> "alkene-reactions-mechanisms"
//! ```
//!
//! Output alphabet is ASCII `[a-z0-9-]`, with no leading, trailing or doubled
//! hyphen. `sanitize` is idempotent.

use crate::errors::CoreError;

/// Turn a display name into its canonical slug.
///
/// Never fails; an all-symbol or empty name yields an empty string. Use
/// [`derive_slug`] when an empty slug must be rejected.
#[must_use]
pub fn sanitize(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for ch in lowered.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            slug.push(ch);
        }
    }

    collapse_hyphens(&slug)
}

/// Derive a slug, rejecting names that sanitize to nothing.
///
/// # Errors
///
/// Returns `CoreError::InvalidName` when the slug would be empty.
pub fn derive_slug(name: &str) -> Result<String, CoreError> {
    let slug = sanitize(name);
    if slug.is_empty() {
        return Err(CoreError::InvalidName(name.to_string()));
    }
    Ok(slug)
}

/// Check that `slug` already has canonical shape (`^[a-z0-9]+(-[a-z0-9]+)*$`).
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.split('-').all(|part| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        })
}

fn collapse_hyphens(raw: &str) -> String {
    raw.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
