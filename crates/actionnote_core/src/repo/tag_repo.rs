//! Tag repository contract and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `tags` and note/tag links in `note_tags`.
//!
//! # Invariants
//! - Names are stored lowercase; uniqueness is case-insensitive.
//! - Attach and detach are idempotent once both rows exist.

use crate::model::note::NoteId;
use crate::model::tag::{normalize_tag, Tag, TagId};
use crate::repo::{ensure_tables, normalize_limit, RepoError, RepoResult, SortOrder};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TAG_SELECT_SQL: &str = "SELECT id, name, created_at FROM tags";
const LIST_LIMIT_DEFAULT: u32 = 50;
const LIST_LIMIT_MAX: u32 = 200;

/// Columns accepted by [`TagListQuery::sort`].
pub const TAG_SORT_FIELDS: &[&str] = &["id", "name", "created_at"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagListQuery {
    pub skip: u32,
    pub limit: Option<u32>,
    pub sort: SortOrder,
}

/// Repository interface for tags.
pub trait TagRepository {
    /// Inserts a new tag; an existing name returns `Conflict`.
    fn create_tag(&self, name: &str) -> RepoResult<TagId>;
    /// Returns the tag named `name`, inserting it when missing.
    fn upsert_tag(&self, name: &str) -> RepoResult<Tag>;
    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>>;
    fn delete_tag(&self, id: TagId) -> RepoResult<()>;
    fn list_tags(&self, query: &TagListQuery) -> RepoResult<Vec<Tag>>;
    fn attach_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()>;
    fn detach_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()>;
}

/// SQLite-backed tag repository.
pub struct SqliteTagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTagRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["tags", "note_tags", "notes"])?;
        Ok(Self { conn })
    }

    fn ensure_note_and_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()> {
        if !row_exists(self.conn, "tags", tag_id)? {
            return Err(RepoError::NotFound {
                entity: "tag",
                id: tag_id,
            });
        }
        if !row_exists(self.conn, "notes", note_id)? {
            return Err(RepoError::NotFound {
                entity: "note",
                id: note_id,
            });
        }
        Ok(())
    }
}

impl TagRepository for SqliteTagRepository<'_> {
    fn create_tag(&self, name: &str) -> RepoResult<TagId> {
        let name = require_name(name)?;
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tags WHERE name = ?1 COLLATE NOCASE);",
            [name.as_str()],
            |row| row.get(0),
        )?;
        if exists == 1 {
            return Err(RepoError::Conflict(format!("tag `{name}` already exists")));
        }

        self.conn
            .execute("INSERT INTO tags (name) VALUES (?1);", [name.as_str()])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn upsert_tag(&self, name: &str) -> RepoResult<Tag> {
        let name = require_name(name)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO tags (name) VALUES (?1);",
            [name.as_str()],
        )?;
        let mut stmt = self.conn.prepare(&format!(
            "{TAG_SELECT_SQL} WHERE name = ?1 COLLATE NOCASE;"
        ))?;
        stmt.query_row([name.as_str()], parse_tag_row)
            .optional()?
            .ok_or_else(|| RepoError::InvalidData(format!("tag `{name}` missing after upsert")))
    }

    fn get_tag(&self, id: TagId) -> RepoResult<Option<Tag>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TAG_SELECT_SQL} WHERE id = ?1;"))?;
        Ok(stmt.query_row([id], parse_tag_row).optional()?)
    }

    fn delete_tag(&self, id: TagId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tags WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "tag", id });
        }
        Ok(())
    }

    fn list_tags(&self, query: &TagListQuery) -> RepoResult<Vec<Tag>> {
        let sql = format!(
            "{TAG_SELECT_SQL}{} LIMIT ?1 OFFSET ?2;",
            query.sort.order_by_sql()
        );
        let limit = normalize_limit(query.limit, LIST_LIMIT_DEFAULT, LIST_LIMIT_MAX);
        let mut stmt = self.conn.prepare(&sql)?;
        let tags = stmt
            .query_map(params![i64::from(limit), i64::from(query.skip)], parse_tag_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags)
    }

    fn attach_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()> {
        self.ensure_note_and_tag(note_id, tag_id)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO note_tags (note_id, tag_id) VALUES (?1, ?2);",
            params![note_id, tag_id],
        )?;
        Ok(())
    }

    fn detach_tag(&self, note_id: NoteId, tag_id: TagId) -> RepoResult<()> {
        self.ensure_note_and_tag(note_id, tag_id)?;
        self.conn.execute(
            "DELETE FROM note_tags WHERE note_id = ?1 AND tag_id = ?2;",
            params![note_id, tag_id],
        )?;
        Ok(())
    }
}

fn require_name(name: &str) -> RepoResult<String> {
    normalize_tag(name).ok_or_else(|| RepoError::InvalidData(format!("blank tag name `{name}`")))
}

fn row_exists(conn: &Connection, table: &'static str, id: i64) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_tag_row(row: &Row<'_>) -> rusqlite::Result<Tag> {
    let name: String = row.get("name")?;
    Ok(Tag {
        id: row.get("id")?,
        name: name.to_lowercase(),
        created_at: row.get("created_at")?,
    })
}
