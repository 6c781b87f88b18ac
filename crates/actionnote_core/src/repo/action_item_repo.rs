//! Action item repository contract and SQLite implementation.
//!
//! # Invariants
//! - List `limit` defaults to 50 and clamps to 200.
//! - Unknown sort fields fall back to `-created_at`.
//! - `note_id`, when given, must reference an existing note.

use crate::model::action_item::{ActionItem, ActionItemId, ActionItemPatch};
use crate::model::note::NoteId;
use crate::repo::{
    bool_to_int, ensure_tables, int_to_bool, normalize_limit, RepoError, RepoResult, SortOrder,
    NOW_MS_SQL,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Row};

const ACTION_ITEM_SELECT_SQL: &str =
    "SELECT id, note_id, description, completed, created_at, updated_at FROM action_items";
const LIST_LIMIT_DEFAULT: u32 = 50;
const LIST_LIMIT_MAX: u32 = 200;

/// Columns accepted by [`ActionItemListQuery::sort`].
pub const ACTION_ITEM_SORT_FIELDS: &[&str] =
    &["id", "description", "completed", "created_at", "updated_at"];

/// Filter and pagination options for listing action items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionItemListQuery {
    pub completed: Option<bool>,
    pub note_id: Option<NoteId>,
    pub skip: u32,
    pub limit: Option<u32>,
    pub sort: SortOrder,
}

/// Repository interface for action items.
pub trait ActionItemRepository {
    fn create_action_item(
        &self,
        description: &str,
        note_id: Option<NoteId>,
    ) -> RepoResult<ActionItemId>;
    fn get_action_item(&self, id: ActionItemId) -> RepoResult<Option<ActionItem>>;
    fn update_action_item(&self, id: ActionItemId, patch: &ActionItemPatch) -> RepoResult<()>;
    fn delete_action_item(&self, id: ActionItemId) -> RepoResult<()>;
    fn list_action_items(&self, query: &ActionItemListQuery) -> RepoResult<Vec<ActionItem>>;
}

/// SQLite-backed action item repository.
pub struct SqliteActionItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActionItemRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["action_items"])?;
        Ok(Self { conn })
    }
}

impl ActionItemRepository for SqliteActionItemRepository<'_> {
    fn create_action_item(
        &self,
        description: &str,
        note_id: Option<NoteId>,
    ) -> RepoResult<ActionItemId> {
        let inserted = self.conn.execute(
            "INSERT INTO action_items (description, note_id, completed) VALUES (?1, ?2, 0);",
            params![description, note_id],
        );
        match inserted {
            Ok(_) => Ok(self.conn.last_insert_rowid()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::NotFound {
                    entity: "note",
                    id: note_id.unwrap_or_default(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_action_item(&self, id: ActionItemId) -> RepoResult<Option<ActionItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ACTION_ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_action_item_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_action_item(&self, id: ActionItemId, patch: &ActionItemPatch) -> RepoResult<()> {
        let changed = self.conn.execute(
            &format!(
                "UPDATE action_items
                 SET
                    description = COALESCE(?2, description),
                    completed = COALESCE(?3, completed),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id,
                patch.description.as_deref(),
                patch.completed.map(bool_to_int)
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "action item",
                id,
            });
        }
        Ok(())
    }

    fn delete_action_item(&self, id: ActionItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM action_items WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "action item",
                id,
            });
        }
        Ok(())
    }

    fn list_action_items(&self, query: &ActionItemListQuery) -> RepoResult<Vec<ActionItem>> {
        let mut sql = format!("{ACTION_ITEM_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(completed) = query.completed {
            sql.push_str(" AND completed = ?");
            bind_values.push(Value::Integer(bool_to_int(completed)));
        }
        if let Some(note_id) = query.note_id {
            sql.push_str(" AND note_id = ?");
            bind_values.push(Value::Integer(note_id));
        }

        sql.push_str(&query.sort.order_by_sql());
        sql.push_str(" LIMIT ? OFFSET ?");
        bind_values.push(Value::Integer(i64::from(normalize_limit(
            query.limit,
            LIST_LIMIT_DEFAULT,
            LIST_LIMIT_MAX,
        ))));
        bind_values.push(Value::Integer(i64::from(query.skip)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_action_item_row(row)?);
        }
        Ok(items)
    }
}

fn parse_action_item_row(row: &Row<'_>) -> RepoResult<ActionItem> {
    Ok(ActionItem {
        id: row.get("id")?,
        note_id: row.get("note_id")?,
        description: row.get("description")?,
        completed: int_to_bool(row.get("completed")?, "action_items.completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
