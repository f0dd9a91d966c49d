//! Core domain logic for the Blackbox notes vault.
//! This crate is the single source of truth for gate, store and purge
//! invariants; presentation layers stay outside.

pub mod db;
pub mod gate;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use gate::{GateConfig, GateEvent, GateState, SessionGate, DEFAULT_PIN, PIN_LENGTH};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{Note, NoteId, CLASSIFICATION};
pub use repo::slot_repo::{
    SlotError, SlotRepository, SlotResult, SqliteSlotRepository, VAULT_NAMESPACE,
};
pub use service::session::{Draft, PurgePhase, VaultSession, View, PURGE_SETTLE, WIPED_HOLD};
pub use service::vault_store::{VaultError, VaultResult, VaultStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
