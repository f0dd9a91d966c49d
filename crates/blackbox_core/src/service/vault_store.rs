//! Vault store: the in-memory note collection plus slot persistence.
//!
//! # Responsibility
//! - Own the ordered note collection (insertion order, newest first).
//! - Serialize the full collection to the durable slot and restore from it.
//!
//! # Invariants
//! - Note ids are unique and strictly increasing across creations.
//! - `load` degrades to an empty collection on absent or malformed payloads;
//!   it never fails the caller for bad data.
//! - `purge_storage` clears memory and deletes the slot row in one call, in
//!   that order.

use crate::model::note::{next_note_id, Note, NoteId};
use crate::repo::slot_repo::{SlotError, SlotRepository};
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type VaultResult<T> = Result<T, VaultError>;

/// Vault persistence error.
///
/// Malformed slot payloads are intentionally absent here: decode failures
/// degrade to an empty collection inside `load` rather than surfacing.
#[derive(Debug)]
pub enum VaultError {
    /// Slot-layer failure.
    Slot(SlotError),
    /// Collection could not be serialized for persistence.
    Encode(serde_json::Error),
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Slot(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode vault payload: {err}"),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<SlotError> for VaultError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

/// Ordered note collection backed by a durable slot.
pub struct VaultStore<R: SlotRepository> {
    repo: R,
    notes: Vec<Note>,
}

impl<R: SlotRepository> VaultStore<R> {
    /// Creates an empty store over the provided slot repository.
    ///
    /// Call [`VaultStore::load`] before serving reads.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            notes: Vec::new(),
        }
    }

    /// Restores the collection from the durable slot.
    ///
    /// Absent slot and malformed payload both yield an empty collection; the
    /// malformed case is logged (metadata only) and otherwise swallowed.
    pub fn load(&mut self) -> VaultResult<()> {
        match self.repo.read_slot()? {
            None => {
                self.notes = Vec::new();
                info!("event=vault_load module=vault status=ok source=absent count=0");
            }
            Some(payload) => match serde_json::from_str::<Vec<Note>>(&payload) {
                Ok(notes) => {
                    info!(
                        "event=vault_load module=vault status=ok source=slot count={}",
                        notes.len()
                    );
                    self.notes = notes;
                }
                Err(err) => {
                    warn!(
                        "event=vault_load module=vault status=degraded reason=malformed_payload error={err}"
                    );
                    self.notes = Vec::new();
                }
            },
        }
        Ok(())
    }

    /// Current collection in stored order, newest first.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Looks up one note by id.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Creates a fresh note and prepends it to the collection.
    ///
    /// The returned clone is the caller's editor seed; the stored record is
    /// only modified again through [`VaultStore::update`].
    pub fn create(&mut self) -> Note {
        let now_ms = Utc::now().timestamp_millis();
        let newest = self.notes.iter().map(|note| note.id).max();
        let note = Note::generate(next_note_id(now_ms, newest));
        info!("event=note_create module=vault status=ok id={}", note.id);
        self.notes.insert(0, note.clone());
        note
    }

    /// Replaces the mutable fields of the matching note.
    ///
    /// Returns `false` (silent no-op) when the id is unknown.
    pub fn update(&mut self, id: NoteId, title: &str, content: &str) -> bool {
        match self.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.title = title.to_string();
                note.content = content.to_string();
                info!("event=note_update module=vault status=ok id={id}");
                true
            }
            None => {
                debug!("event=note_update module=vault status=noop reason=not_found id={id}");
                false
            }
        }
    }

    /// Removes the matching note.
    ///
    /// Returns `false` (silent no-op) when the id is unknown.
    pub fn delete(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|note| note.id != id);
        let removed = self.notes.len() != before;
        if removed {
            info!("event=note_delete module=vault status=ok id={id}");
        } else {
            debug!("event=note_delete module=vault status=noop reason=not_found id={id}");
        }
        removed
    }

    /// Serializes the full collection into the durable slot.
    ///
    /// Callers own the write-ordering rule: never invoke while the gate is
    /// locked or a purge is in flight.
    pub fn persist(&self) -> VaultResult<()> {
        let payload = serde_json::to_string(&self.notes).map_err(VaultError::Encode)?;
        self.repo.write_slot(&payload)?;
        debug!(
            "event=vault_persist module=vault status=ok count={}",
            self.notes.len()
        );
        Ok(())
    }

    /// Irreversibly clears the collection and deletes the slot row.
    ///
    /// Memory is cleared first so a failed slot delete still leaves nothing
    /// readable in this process.
    pub fn purge_storage(&mut self) -> VaultResult<()> {
        self.notes.clear();
        self.repo.clear_slot()?;
        info!("event=vault_purge module=vault status=ok");
        Ok(())
    }
}
