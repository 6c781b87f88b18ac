//! Tag use-case service.

use crate::model::note::NoteId;
use crate::model::tag::{normalize_tag, Tag, TagId};
use crate::repo::tag_repo::{TagListQuery, TagRepository};
use crate::service::{ServiceError, ServiceResult};

pub struct TagService<R: TagRepository> {
    repo: R,
}

impl<R: TagRepository> TagService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a tag; the name is normalized to lowercase first.
    pub fn create_tag(&self, name: &str) -> ServiceResult<Tag> {
        let normalized = normalize_tag(name)
            .ok_or_else(|| ServiceError::InvalidInput(format!("invalid tag: `{name}`")))?;
        let id = self.repo.create_tag(&normalized)?;
        self.get_tag(id)
    }

    pub fn get_tag(&self, id: TagId) -> ServiceResult<Tag> {
        self.repo
            .get_tag(id)?
            .ok_or(ServiceError::NotFound { entity: "tag", id })
    }

    pub fn delete_tag(&self, id: TagId) -> ServiceResult<()> {
        Ok(self.repo.delete_tag(id)?)
    }

    pub fn list_tags(&self, query: &TagListQuery) -> ServiceResult<Vec<Tag>> {
        Ok(self.repo.list_tags(query)?)
    }

    pub fn attach_tag(&self, note_id: NoteId, tag_id: TagId) -> ServiceResult<()> {
        Ok(self.repo.attach_tag(note_id, tag_id)?)
    }

    pub fn detach_tag(&self, note_id: NoteId, tag_id: TagId) -> ServiceResult<()> {
        Ok(self.repo.detach_tag(note_id, tag_id)?)
    }
}
