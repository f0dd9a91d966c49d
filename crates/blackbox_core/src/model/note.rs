//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and its creation defaults.
//! - Provide id allocation that stays monotonic across rapid creation.
//!
//! # Invariants
//! - `id` is unique within a vault and never reused.
//! - `date` and `classification` are set at creation and immutable after.
//! - Generated titles follow the `LOG_ENTRY_<4-digit>` pattern.

use chrono::Local;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Stable identifier for a note, derived from the creation epoch millisecond.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = i64;

/// Classification label stamped on every note at creation.
pub const CLASSIFICATION: &str = "TOP SECRET";

/// Display format for the immutable creation date string.
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Persisted note record.
///
/// Field names match the serialized slot payload and must stay stable, since
/// existing vault slots are decoded with this exact shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable id, monotonically increasing, never reused.
    pub id: NoteId,
    /// Free-text title, mutable through update.
    pub title: String,
    /// Free-text body, mutable through update.
    pub content: String,
    /// Creation date display string, set once.
    pub date: String,
    /// Fixed classification label.
    pub classification: String,
}

impl Note {
    /// Creates a fresh note with generated title and creation metadata.
    ///
    /// # Contract
    /// - `title` is `LOG_ENTRY_<n>` with `n` uniformly random in 1000..=9999.
    /// - `content` starts empty.
    /// - `date` is the local creation date, `classification` is fixed.
    pub fn generate(id: NoteId) -> Self {
        let suffix: u16 = rand::rng().random_range(1000..=9999);
        Self {
            id,
            title: format!("LOG_ENTRY_{suffix}"),
            content: String::new(),
            date: Local::now().format(DATE_FORMAT).to_string(),
            classification: CLASSIFICATION.to_string(),
        }
    }
}

/// Allocates the next note id from a creation timestamp.
///
/// Ids are epoch milliseconds, bumped past the newest existing id when two
/// notes land on the same millisecond. This keeps ids unique and strictly
/// increasing without a separate counter.
pub fn next_note_id(now_epoch_ms: i64, newest_existing: Option<NoteId>) -> NoteId {
    match newest_existing {
        Some(max) if max >= now_epoch_ms => max + 1,
        _ => now_epoch_ms,
    }
}
