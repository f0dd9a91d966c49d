//! Vault session: gate + store orchestration.
//!
//! # Responsibility
//! - Compose the session gate and vault store behind one facade.
//! - Enforce the interaction contract: mutations and persistence only while
//!   unlocked and not mid-purge.
//! - Drive view navigation (login / list / editor) and the editor draft
//!   lifecycle.
//!
//! # Invariants
//! - `Login` is the only view while the gate is locked; `List`/`Editor`
//!   require `Unlocked`.
//! - The editor draft is an independent copy; `save_draft` is the only
//!   commit path, any other navigation discards it.
//! - A confirmed purge runs to completion; no session operation interrupts
//!   it.

use crate::gate::{GateEvent, GateState, SessionGate};
use crate::model::note::{Note, NoteId};
use crate::repo::slot_repo::SlotRepository;
use crate::service::vault_store::{VaultResult, VaultStore};
use log::{info, warn};
use std::time::{Duration, Instant};

/// Visual-settle hold between purge confirmation and the actual wipe.
pub const PURGE_SETTLE: Duration = Duration::from_millis(600);

/// Display hold on the wiped signal before resetting to the lock screen.
pub const WIPED_HOLD: Duration = Duration::from_millis(3000);

/// Navigable session views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Lock screen; the only view while the gate is locked.
    Login,
    /// Note list; default view after unlock.
    List,
    /// Note editor over a draft copy.
    Editor,
}

/// Purge sub-state machine.
///
/// Tracked separately from [`GateState`] so invalid flag combinations of the
/// kind "wiped while unlocked and editing" cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgePhase {
    /// No purge in progress.
    Idle,
    /// Purge requested, waiting for explicit confirmation or abort.
    AwaitingConfirm,
    /// Confirmed; holding for the settle delay before the wipe executes.
    Purging,
    /// Wipe done; holding the wiped signal before relocking.
    Wiped,
}

/// Uncommitted editor copy of one note.
///
/// Lives only while the editor view is open. Committing goes through
/// [`VaultSession::save_draft`]; everything else drops edits on the floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub note_id: NoteId,
    pub title: String,
    pub content: String,
}

impl Draft {
    fn from_note(note: &Note) -> Self {
        Self {
            note_id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

/// Session facade over gate, store, view and purge state.
pub struct VaultSession<R: SlotRepository> {
    gate: SessionGate,
    store: VaultStore<R>,
    view: View,
    draft: Option<Draft>,
    purge: PurgePhase,
    purge_due: Option<Instant>,
}

impl<R: SlotRepository> VaultSession<R> {
    /// Starts a locked session, restoring the collection from the slot.
    pub fn start(gate: SessionGate, mut store: VaultStore<R>) -> VaultResult<Self> {
        store.load()?;
        Ok(Self {
            gate,
            store,
            view: View::Login,
            draft: None,
            purge: PurgePhase::Idle,
            purge_due: None,
        })
    }

    /// Current view.
    pub fn view(&self) -> View {
        self.view
    }

    /// Current gate state.
    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Current purge phase.
    pub fn purge_phase(&self) -> PurgePhase {
        self.purge
    }

    /// Digits currently buffered on the lock screen.
    pub fn buffer_len(&self) -> usize {
        self.gate.buffer_len()
    }

    /// Current note collection, newest first.
    pub fn notes(&self) -> &[Note] {
        self.store.list()
    }

    /// Open editor draft, if any.
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    // --- lock screen -----------------------------------------------------

    /// Appends one digit to the credential buffer.
    pub fn submit_digit(&mut self, digit: u8) {
        self.gate.submit_digit(digit);
    }

    /// Removes the most recent buffered digit.
    pub fn delete_digit(&mut self) {
        self.gate.delete_digit();
    }

    /// Validates the buffered credential.
    pub fn attempt_unlock(&mut self, now: Instant) {
        self.gate.attempt_unlock(now);
    }

    /// Relocks the session, discarding the editor draft.
    ///
    /// No-op while a purge is in flight; a confirmed purge owns the relock.
    pub fn relock(&mut self) {
        if self.purge != PurgePhase::Idle {
            return;
        }
        if self.gate.is_unlocked() {
            self.gate.relock();
            self.draft = None;
            self.view = View::Login;
        }
    }

    /// Fires due deferred transitions (gate and purge).
    ///
    /// Call on every tick of the embedding event loop.
    pub fn poll(&mut self, now: Instant) -> VaultResult<()> {
        match self.gate.poll(now) {
            Some(GateEvent::Unlocked) => {
                self.view = View::List;
            }
            Some(GateEvent::RejectionCleared) | None => {}
        }

        match (self.purge, self.purge_due) {
            (PurgePhase::Purging, Some(due)) if now >= due => {
                self.store.purge_storage()?;
                self.purge = PurgePhase::Wiped;
                self.purge_due = Some(now + WIPED_HOLD);
            }
            (PurgePhase::Wiped, Some(due)) if now >= due => {
                self.purge = PurgePhase::Idle;
                self.purge_due = None;
                self.draft = None;
                self.gate.relock();
                self.view = View::Login;
                info!("event=session_reset module=session status=ok reason=purge_complete");
            }
            _ => {}
        }

        Ok(())
    }

    // --- note operations -------------------------------------------------

    /// Creates a note, opens it in the editor and persists.
    ///
    /// Any previously open draft is discarded without commit. Refused
    /// (silent `None`) while locked or mid-purge.
    pub fn create_note(&mut self) -> VaultResult<Option<NoteId>> {
        if !self.can_mutate("create_note") {
            return Ok(None);
        }
        let note = self.store.create();
        self.draft = Some(Draft::from_note(&note));
        self.view = View::Editor;
        self.store.persist()?;
        Ok(Some(note.id))
    }

    /// Opens an existing note in the editor as a fresh draft copy.
    ///
    /// Unknown ids and refused sessions leave the view unchanged.
    pub fn open_note(&mut self, id: NoteId) -> bool {
        if !self.can_mutate("open_note") {
            return false;
        }
        match self.store.get(id) {
            Some(note) => {
                self.draft = Some(Draft::from_note(note));
                self.view = View::Editor;
                true
            }
            None => false,
        }
    }

    /// Replaces the draft's editable fields. No-op without an open draft.
    pub fn edit_draft(&mut self, title: &str, content: &str) {
        if let Some(draft) = self.draft.as_mut() {
            draft.title = title.to_string();
            draft.content = content.to_string();
        }
    }

    /// Commits the draft back into the collection and returns to the list.
    ///
    /// Returns `Ok(false)` when there is nothing to commit or the underlying
    /// note no longer exists; the session still navigates back in the latter
    /// case, matching delete-while-editing semantics.
    pub fn save_draft(&mut self) -> VaultResult<bool> {
        if !self.can_mutate("save_draft") {
            return Ok(false);
        }
        let Some(draft) = self.draft.take() else {
            return Ok(false);
        };
        let committed = self.store.update(draft.note_id, &draft.title, &draft.content);
        self.view = View::List;
        if committed {
            self.store.persist()?;
        }
        Ok(committed)
    }

    /// Returns to the list, silently discarding any uncommitted draft.
    pub fn close_editor(&mut self) {
        if !self.gate.is_unlocked() {
            return;
        }
        self.draft = None;
        if self.view == View::Editor {
            self.view = View::List;
        }
    }

    /// Deletes a note and persists.
    ///
    /// Deleting the note currently open in the editor also closes the editor
    /// and drops its draft. Unknown ids are a silent no-op.
    pub fn delete_note(&mut self, id: NoteId) -> VaultResult<bool> {
        if !self.can_mutate("delete_note") {
            return Ok(false);
        }
        let removed = self.store.delete(id);
        if self.draft.as_ref().is_some_and(|draft| draft.note_id == id) {
            self.draft = None;
            self.view = View::List;
        }
        if removed {
            self.store.persist()?;
        }
        Ok(removed)
    }

    // --- purge -----------------------------------------------------------

    /// Arms the purge confirmation step.
    pub fn request_purge(&mut self) {
        if !self.can_mutate("request_purge") {
            return;
        }
        self.purge = PurgePhase::AwaitingConfirm;
    }

    /// Disarms an unconfirmed purge request.
    pub fn abort_purge(&mut self) {
        if self.purge == PurgePhase::AwaitingConfirm {
            self.purge = PurgePhase::Idle;
        }
    }

    /// Confirms the purge; the wipe executes after the settle delay.
    ///
    /// From this point the sequence runs to completion through
    /// [`VaultSession::poll`] and cannot be interrupted.
    pub fn confirm_purge(&mut self, now: Instant) {
        if self.purge != PurgePhase::AwaitingConfirm {
            return;
        }
        info!("event=purge_confirm module=session status=ok");
        self.purge = PurgePhase::Purging;
        self.purge_due = Some(now + PURGE_SETTLE);
    }

    fn can_mutate(&self, op: &str) -> bool {
        if !self.gate.is_unlocked() {
            warn!("event=session_refused module=session reason=locked op={op}");
            return false;
        }
        if self.purge == PurgePhase::Purging || self.purge == PurgePhase::Wiped {
            warn!("event=session_refused module=session reason=purge_in_flight op={op}");
            return false;
        }
        true
    }
}
