//! Domain model for vault records.
//!
//! # Responsibility
//! - Define the canonical note record persisted in the vault slot.
//!
//! # Invariants
//! - Every note is identified by a stable, monotonically increasing `NoteId`.
//! - Creation metadata (`date`, `classification`) is set once and never
//!   rewritten by update paths.

pub mod note;
