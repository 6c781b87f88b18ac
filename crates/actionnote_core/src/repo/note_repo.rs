//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `notes`, with attached tag names loaded on read.
//! - Paginated, sorted, case-insensitive substring search.
//!
//! # Invariants
//! - `page` is 1-based; `page_size` defaults to 10 and clamps to 100.
//! - `total` counts every row matching the filter, independent of paging.
//! - Search wildcards in the user query are matched literally.

use crate::model::note::{Note, NoteId, NotePatch};
use crate::repo::{ensure_tables, normalize_limit, RepoError, RepoResult, NOW_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use serde::Serialize;

const NOTE_SELECT_SQL: &str = "SELECT id, title, content, created_at, updated_at FROM notes";
const PAGE_SIZE_DEFAULT: u32 = 10;
const PAGE_SIZE_MAX: u32 = 100;

/// Sort order for note search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotesSort {
    #[default]
    CreatedDesc,
    TitleAsc,
}

impl NotesSort {
    /// Parses `created_desc` / `title_asc`; anything else is `CreatedDesc`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "title_asc" => Self::TitleAsc,
            _ => Self::CreatedDesc,
        }
    }

    fn order_by_sql(self) -> &'static str {
        match self {
            Self::CreatedDesc => " ORDER BY created_at DESC, id DESC",
            Self::TitleAsc => " ORDER BY title COLLATE NOCASE ASC, id ASC",
        }
    }
}

/// Search options for note list use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSearchQuery {
    /// Substring matched against title or content, case-insensitively.
    pub q: Option<String>,
    /// 1-based page; `0` is treated as `1`.
    pub page: u32,
    pub page_size: Option<u32>,
    pub sort: NotesSort,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePage {
    pub items: Vec<Note>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Repository interface for notes.
pub trait NoteRepository {
    /// Inserts one note and returns its id.
    fn create_note(&self, title: &str, content: &str) -> RepoResult<NoteId>;
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Applies a partial update; unknown ids return `NotFound`.
    fn update_note(&self, id: NoteId, patch: &NotePatch) -> RepoResult<()>;
    fn delete_note(&self, id: NoteId) -> RepoResult<()>;
    fn search_notes(&self, query: &NoteSearchQuery) -> RepoResult<NotePage>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["notes", "tags", "note_tags"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&self, title: &str, content: &str) -> RepoResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (title, content) VALUES (?1, ?2);",
            params![title, content],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(self.conn, row)?)),
            None => Ok(None),
        }
    }

    fn update_note(&self, id: NoteId, patch: &NotePatch) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE notes
                 SET
                    title = COALESCE(?2, title),
                    content = COALESCE(?3, content),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, patch.title.as_deref(), patch.content.as_deref()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "note", id });
        }
        Ok(())
    }

    fn delete_note(&self, id: NoteId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "note", id });
        }
        Ok(())
    }

    fn search_notes(&self, query: &NoteSearchQuery) -> RepoResult<NotePage> {
        let mut filter = String::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            filter.push_str(
                " WHERE (lower(title) LIKE ?1 ESCAPE '\\' OR lower(content) LIKE ?1 ESCAPE '\\')",
            );
            bind_values.push(Value::Text(format!("%{}%", escape_like(&q.to_lowercase()))));
        }

        let total: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM notes{filter};"),
            params_from_iter(bind_values.iter()),
            |row| row.get(0),
        )?;

        let page = query.page.max(1);
        let page_size = normalize_limit(query.page_size, PAGE_SIZE_DEFAULT, PAGE_SIZE_MAX);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let limit_slot = bind_values.len() + 1;
        let sql = format!(
            "{NOTE_SELECT_SQL}{filter}{} LIMIT ?{limit_slot} OFFSET ?{};",
            query.sort.order_by_sql(),
            limit_slot + 1
        );
        bind_values.push(Value::Integer(i64::from(page_size)));
        bind_values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_note_row(self.conn, row)?);
        }

        Ok(NotePage {
            items,
            total: u64::try_from(total)
                .map_err(|_| RepoError::InvalidData(format!("negative note count {total}")))?,
            page,
            page_size,
        })
    }
}

fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id: NoteId = row.get("id")?;
    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags: load_tags_for_note(conn, id)?,
    })
}

pub(crate) fn load_tags_for_note(conn: &Connection, note_id: NoteId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name
         FROM note_tags nt
         INNER JOIN tags t ON t.id = nt.tag_id
         WHERE nt.note_id = ?1
         ORDER BY t.name COLLATE NOCASE ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        let name: String = row.get(0)?;
        tags.push(name.to_lowercase());
    }
    Ok(tags)
}
