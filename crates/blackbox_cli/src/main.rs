//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `blackbox_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use blackbox_core::db::open_db_in_memory;
use blackbox_core::{SessionGate, SqliteSlotRepository, VaultSession, VaultStore};

fn main() {
    println!("blackbox_core version={}", blackbox_core::core_version());

    // End-to-end wiring probe over an in-memory database.
    let status = match smoke() {
        Ok(count) => format!("ok notes={count}"),
        Err(message) => format!("error {message}"),
    };
    println!("blackbox_core smoke={status}");
}

fn smoke() -> Result<usize, String> {
    let conn = open_db_in_memory().map_err(|err| err.to_string())?;
    let repo = SqliteSlotRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let session =
        VaultSession::start(SessionGate::default(), VaultStore::new(repo)).map_err(|err| err.to_string())?;
    Ok(session.notes().len())
}
