//! # lec-core
//!
//! Core types, ID prefixes, and error types for Lectern.
//!
//! This crate provides the foundational types shared across all Lectern crates:
//! - Entity structs for the ledger (subjects, topics, materials, tasks, CLOs)
//! - Closed enums, including the task status state machine
//! - The slug sanitizer used for subject and topic identity
//! - The structured `MaterialVersion` pair
//! - Cross-cutting error types and their transport classification
//! - Read-side response types (statistics)

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod slug;
pub mod version;
