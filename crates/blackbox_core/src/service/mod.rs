//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gate and slot persistence into use-case level APIs.
//! - Keep embedding binaries decoupled from storage details.

pub mod session;
pub mod vault_store;
