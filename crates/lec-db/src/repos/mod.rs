//! Repository modules implementing ledger operations.
//!
//! Each module adds methods to `LedgerService` via `impl LedgerService` blocks.
//! Row fetchers that take a `&libsql::Connection` are shared between modules
//! so they can run inside another operation's transaction.

pub mod audit;
pub mod clo;
pub mod material;
pub mod stats;
pub mod subject;
pub mod task;
pub mod topic;
