//! Typed update payloads.
//!
//! Renames and description edits use builders so callers only set the fields
//! they change; the status payload carries producer-reported details.

pub mod subject;
pub mod task;
pub mod topic;
