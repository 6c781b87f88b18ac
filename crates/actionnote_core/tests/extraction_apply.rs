use actionnote_core::db::open_db_in_memory;
use actionnote_core::{
    ActionItemListQuery, ActionItemService, ChatClient, ExtractionMode, ExtractionService,
    LlmError, NoteService, RepoError, ServiceError, SqliteActionItemRepository,
    SqliteNoteRepository, SqliteTagRepository, TagListQuery, TagService,
};

struct FixedClient(&'static str);

impl ChatClient for FixedClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
}

struct BrokenClient;

impl ChatClient for BrokenClient {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Http {
            status: 500,
            body: "boom".to_string(),
        })
    }
}

fn seed_note(conn: &rusqlite::Connection, content: &str) -> i64 {
    NoteService::new(SqliteNoteRepository::try_new(conn).unwrap())
        .create_note("X", content)
        .unwrap()
        .id
}

#[test]
fn preview_extraction_does_not_persist() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = seed_note(&conn, "Do this\n- [ ] task1\n#alpha #beta");

    let result = ExtractionService::new(&mut conn)
        .extract_note(note_id, false, ExtractionMode::Heuristic)
        .unwrap();
    assert_eq!(result.tags, vec!["alpha", "beta"]);
    assert_eq!(result.action_items, vec!["task1"]);
    assert!(!result.applied);
    assert!(!result.used_fallback);

    let items = ActionItemService::new(SqliteActionItemRepository::try_new(&conn).unwrap())
        .list_action_items(&ActionItemListQuery::default())
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn apply_persists_tags_and_linked_items() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = seed_note(&conn, "Do this\n- [ ] task1\n#alpha #Beta");
    TagService::new(SqliteTagRepository::try_new(&conn).unwrap())
        .create_tag("alpha")
        .unwrap();

    let result = ExtractionService::new(&mut conn)
        .extract_note(note_id, true, ExtractionMode::Heuristic)
        .unwrap();
    assert!(result.applied);

    let note = NoteService::new(SqliteNoteRepository::try_new(&conn).unwrap())
        .get_note(note_id)
        .unwrap();
    assert_eq!(note.tags, vec!["alpha", "beta"]);

    let all_tags = TagService::new(SqliteTagRepository::try_new(&conn).unwrap())
        .list_tags(&TagListQuery::default())
        .unwrap();
    assert_eq!(all_tags.len(), 2);

    let items = ActionItemService::new(SqliteActionItemRepository::try_new(&conn).unwrap())
        .list_action_items(&ActionItemListQuery {
            note_id: Some(note_id),
            ..ActionItemListQuery::default()
        })
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].description.to_lowercase(), "task1");
    assert!(!items[0].completed);
}

#[test]
fn llm_mode_uses_model_items() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = seed_note(&conn, "we should probably set up CI at some point");

    let client = FixedClient(r#"{"items": ["Set up CI"]}"#);
    let result = ExtractionService::new(&mut conn)
        .extract_note(note_id, false, ExtractionMode::Llm(&client))
        .unwrap();
    assert_eq!(result.action_items, vec!["Set up CI"]);
    assert!(!result.used_fallback);
}

#[test]
fn llm_failure_degrades_to_heuristic() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = seed_note(&conn, "TODO: rotate keys\nplain line");

    let result = ExtractionService::new(&mut conn)
        .extract_note(note_id, false, ExtractionMode::Llm(&BrokenClient))
        .unwrap();
    assert_eq!(result.action_items, vec!["rotate keys"]);
    assert!(result.used_fallback);
}

#[test]
fn missing_note_is_not_found() {
    let mut conn = open_db_in_memory().unwrap();
    let err = ExtractionService::new(&mut conn)
        .extract_note(5, true, ExtractionMode::Heuristic)
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { entity: "note", id: 5 }));
}

fn count_rows(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn failed_apply_rolls_back_tag_writes() {
    let mut conn = open_db_in_memory().unwrap();
    let note_id = seed_note(&conn, "- ship it\n#alpha #beta");
    conn.execute_batch("DROP TABLE action_items;").unwrap();

    let err = ExtractionService::new(&mut conn)
        .extract_note(note_id, true, ExtractionMode::Heuristic)
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Repo(RepoError::MissingRequiredTable("action_items"))
    ));

    assert_eq!(count_rows(&conn, "tags"), 0);
    assert_eq!(count_rows(&conn, "note_tags"), 0);
}
