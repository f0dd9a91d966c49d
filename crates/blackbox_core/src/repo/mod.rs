//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the durable slot contract the vault persists through.
//! - Isolate SQLite query details from gate/session orchestration.
//!
//! # Invariants
//! - The slot layer stores opaque payload text; it never interprets note
//!   contents.
//! - Repository APIs return semantic errors in addition to DB transport
//!   errors.

pub mod slot_repo;
