//! Action item record and write models.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};

pub type ActionItemId = i64;

/// Persisted action item, optionally linked to the note it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub id: ActionItemId,
    /// Source note; cleared when the note is deleted.
    pub note_id: Option<NoteId>,
    pub description: String,
    pub completed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItemPatch {
    pub description: Option<String>,
    pub completed: Option<bool>,
}
