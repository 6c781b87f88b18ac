//! Core domain logic for actionnote.
//!
//! Free-text action-item and hashtag extraction, plus the SQLite notes
//! store that persists what was extracted.

pub mod config;
pub mod db;
pub mod extract;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError, LlmConfig};
pub use extract::{
    extract_action_items, extract_action_items_llm, extract_hashtags, extract_line_matches,
    try_extract_action_items_llm, ChatClient, LineMatch, LineRule, LlmError, LlmOutcome,
    OllamaClient, Priority,
};
pub use logging::{
    default_log_level, init_logging, init_stderr_logging, logging_status, LoggingError,
};
pub use model::action_item::{ActionItem, ActionItemId, ActionItemPatch};
pub use model::note::{Note, NoteId, NotePatch};
pub use model::tag::{Tag, TagId};
pub use repo::action_item_repo::{
    ActionItemListQuery, ActionItemRepository, SqliteActionItemRepository,
    ACTION_ITEM_SORT_FIELDS,
};
pub use repo::note_repo::{
    NotePage, NoteRepository, NoteSearchQuery, NotesSort, SqliteNoteRepository,
};
pub use repo::tag_repo::{SqliteTagRepository, TagListQuery, TagRepository, TAG_SORT_FIELDS};
pub use repo::{RepoError, RepoResult, SortOrder};
pub use service::action_item_service::ActionItemService;
pub use service::extraction_service::{ExtractionMode, ExtractionResult, ExtractionService};
pub use service::note_service::NoteService;
pub use service::tag_service::TagService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
