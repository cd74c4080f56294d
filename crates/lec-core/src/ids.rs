//! ID prefix constants.
//!
//! Every persisted entity gets an ID of the form `{prefix}-{16 hex chars}`,
//! generated by the database (see `LecDb::generate_id`).

pub const PREFIX_SUBJECT: &str = "sub";
pub const PREFIX_TOPIC: &str = "top";
pub const PREFIX_MATERIAL: &str = "mat";
pub const PREFIX_TASK: &str = "tsk";
pub const PREFIX_CLO: &str = "clo";
pub const PREFIX_AUDIT: &str = "aud";

/// All prefixes, for exhaustive tests.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_SUBJECT,
    PREFIX_TOPIC,
    PREFIX_MATERIAL,
    PREFIX_TASK,
    PREFIX_CLO,
    PREFIX_AUDIT,
];
