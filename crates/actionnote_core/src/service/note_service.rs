//! Note use-case service.
//!
//! # Invariants
//! - Title and content must be non-blank on create and when patched.
//! - Every write returns the read-back record.

use crate::model::note::{Note, NoteId, NotePatch};
use crate::repo::note_repo::{NotePage, NoteRepository, NoteSearchQuery};
use crate::service::{require_text, ServiceError, ServiceResult};
use log::info;

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_note(&self, title: &str, content: &str) -> ServiceResult<Note> {
        require_text("title", title)?;
        require_text("content", content)?;

        let id = self.repo.create_note(title.trim(), content)?;
        info!("event=note_create module=service status=ok note_id={id}");
        self.repo
            .get_note(id)?
            .ok_or(ServiceError::InconsistentState("created note not found in read-back"))
    }

    pub fn get_note(&self, id: NoteId) -> ServiceResult<Note> {
        self.repo
            .get_note(id)?
            .ok_or(ServiceError::NotFound { entity: "note", id })
    }

    /// Applies a partial update. An empty patch returns the note unchanged.
    pub fn update_note(&self, id: NoteId, patch: &NotePatch) -> ServiceResult<Note> {
        if let Some(title) = patch.title.as_deref() {
            require_text("title", title)?;
        }
        if let Some(content) = patch.content.as_deref() {
            require_text("content", content)?;
        }
        if !patch.is_empty() {
            self.repo.update_note(id, patch)?;
        }
        self.get_note(id)
    }

    pub fn delete_note(&self, id: NoteId) -> ServiceResult<()> {
        self.repo.delete_note(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    pub fn search_notes(&self, query: &NoteSearchQuery) -> ServiceResult<NotePage> {
        Ok(self.repo.search_notes(query)?)
    }
}
