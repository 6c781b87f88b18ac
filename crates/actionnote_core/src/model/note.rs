//! Note record and write models.

use serde::{Deserialize, Serialize};

pub type NoteId = i64;

/// Persisted note with its attached tag names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Attached tag names, lowercase, sorted by name.
    pub tags: Vec<String>,
}

/// Partial update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NotePatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}
