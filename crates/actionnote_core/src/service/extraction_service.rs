//! Note extraction use-case.
//!
//! # Responsibility
//! - Run hashtag and action-item extraction over a stored note.
//! - Optionally persist the results: upsert + attach tags, create linked
//!   action items.
//!
//! # Invariants
//! - `apply` writes happen in one transaction; a failure leaves no partial
//!   tags or items behind.
//! - Extraction itself never fails; model errors degrade to the heuristic.

use crate::extract::{
    extract_action_items, extract_hashtags, try_extract_action_items_llm, ChatClient,
};
use crate::model::note::NoteId;
use crate::repo::action_item_repo::{ActionItemRepository, SqliteActionItemRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::tag_repo::{SqliteTagRepository, TagRepository};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

/// Strategy for action-item extraction.
#[derive(Clone, Copy)]
pub enum ExtractionMode<'a> {
    Heuristic,
    /// Chat model with heuristic fallback.
    Llm(&'a dyn ChatClient),
}

/// Extraction response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub tags: Vec<String>,
    pub action_items: Vec<String>,
    /// Whether results were persisted.
    pub applied: bool,
    /// Whether a model failure forced the heuristic.
    pub used_fallback: bool,
}

pub struct ExtractionService<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ExtractionService<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Extracts tags and action items from note `note_id`.
    ///
    /// With `apply`, tags are upserted and attached to the note and one open
    /// action item is created per extracted string, linked to the note.
    pub fn extract_note(
        &mut self,
        note_id: NoteId,
        apply: bool,
        mode: ExtractionMode<'_>,
    ) -> ServiceResult<ExtractionResult> {
        let content = SqliteNoteRepository::try_new(self.conn)?
            .get_note(note_id)?
            .ok_or(ServiceError::NotFound {
                entity: "note",
                id: note_id,
            })?
            .content;

        let tags = extract_hashtags(&content);
        let (action_items, used_fallback) = match mode {
            ExtractionMode::Heuristic => (extract_action_items(&content), false),
            ExtractionMode::Llm(client) => {
                let outcome = try_extract_action_items_llm(&content, client);
                let used_fallback = outcome.is_fallback();
                (outcome.resolve(&content), used_fallback)
            }
        };

        if apply {
            self.persist(note_id, &tags, &action_items)?;
        }

        info!(
            "event=note_extract module=service status=ok note_id={} tag_count={} item_count={} applied={} fallback={}",
            note_id,
            tags.len(),
            action_items.len(),
            apply,
            used_fallback
        );

        Ok(ExtractionResult {
            tags,
            action_items,
            applied: apply,
            used_fallback,
        })
    }

    fn persist(
        &mut self,
        note_id: NoteId,
        tags: &[String],
        action_items: &[String],
    ) -> ServiceResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
            let tag_repo = SqliteTagRepository::try_new(&tx)?;
            for name in tags {
                let tag = tag_repo.upsert_tag(name)?;
                tag_repo.attach_tag(note_id, tag.id)?;
            }

            let item_repo = SqliteActionItemRepository::try_new(&tx)?;
            for description in action_items {
                item_repo.create_action_item(description, Some(note_id))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}
