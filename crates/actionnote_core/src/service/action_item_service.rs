//! Action item use-case service.

use crate::model::action_item::{ActionItem, ActionItemId, ActionItemPatch};
use crate::model::note::NoteId;
use crate::repo::action_item_repo::{ActionItemListQuery, ActionItemRepository};
use crate::service::{require_text, ServiceError, ServiceResult};

pub struct ActionItemService<R: ActionItemRepository> {
    repo: R,
}

impl<R: ActionItemRepository> ActionItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an open action item, optionally linked to a note.
    pub fn create_action_item(
        &self,
        description: &str,
        note_id: Option<NoteId>,
    ) -> ServiceResult<ActionItem> {
        require_text("description", description)?;
        let id = self
            .repo
            .create_action_item(description.trim(), note_id)?;
        self.repo
            .get_action_item(id)?
            .ok_or(ServiceError::InconsistentState(
                "created action item not found in read-back",
            ))
    }

    pub fn get_action_item(&self, id: ActionItemId) -> ServiceResult<ActionItem> {
        self.repo
            .get_action_item(id)?
            .ok_or(ServiceError::NotFound {
                entity: "action item",
                id,
            })
    }

    pub fn update_action_item(
        &self,
        id: ActionItemId,
        patch: &ActionItemPatch,
    ) -> ServiceResult<ActionItem> {
        if let Some(description) = patch.description.as_deref() {
            require_text("description", description)?;
        }
        self.repo.update_action_item(id, patch)?;
        self.get_action_item(id)
    }

    /// Marks an action item as completed.
    pub fn complete_action_item(&self, id: ActionItemId) -> ServiceResult<ActionItem> {
        let patch = ActionItemPatch {
            description: None,
            completed: Some(true),
        };
        self.update_action_item(id, &patch)
    }

    pub fn delete_action_item(&self, id: ActionItemId) -> ServiceResult<()> {
        Ok(self.repo.delete_action_item(id)?)
    }

    pub fn list_action_items(&self, query: &ActionItemListQuery) -> ServiceResult<Vec<ActionItem>> {
        Ok(self.repo.list_action_items(query)?)
    }
}
