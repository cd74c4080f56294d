//! Entity structs for all Lectern ledger records.
//!
//! Each entity maps to a table in the libSQL database (see `lec-db/migrations`).
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! output and schema validation.

mod audit;
mod clo;
mod material;
mod subject;
mod task;
mod topic;

pub use audit::AuditEntry;
pub use clo::Clo;
pub use material::{Material, MaterialRevision};
pub use subject::Subject;
pub use task::Task;
pub use topic::Topic;
