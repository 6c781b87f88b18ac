//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.
//! - Sort columns are whitelisted before they reach SQL text.

use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod action_item_repo;
pub mod note_repo;
pub mod tag_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound { entity: &'static str, id: i64 },
    /// Unique constraint would be violated.
    Conflict(String),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; was the database migrated?")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Column + direction for list ordering.
///
/// Parsed from `field` / `-field` strings; `field` is always one of the
/// caller's whitelisted column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: &'static str,
    pub descending: bool,
}

impl SortOrder {
    /// Default ordering for list endpoints: newest first.
    pub const NEWEST_FIRST: Self = Self {
        field: "created_at",
        descending: true,
    };

    /// Parses `value` against `allowed` columns, falling back to
    /// [`SortOrder::NEWEST_FIRST`] for unknown fields.
    pub fn parse(value: &str, allowed: &[&'static str]) -> Self {
        let value = value.trim();
        let (name, descending) = match value.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (value, false),
        };
        allowed
            .iter()
            .find(|column| **column == name)
            .map_or(Self::NEWEST_FIRST, |column| Self {
                field: *column,
                descending,
            })
    }

    /// Renders an `ORDER BY` clause with `id` as tie-breaker.
    pub(crate) fn order_by_sql(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        if self.field == "id" {
            format!(" ORDER BY id {direction}")
        } else {
            format!(" ORDER BY {} {direction}, id {direction}", self.field)
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::NEWEST_FIRST
    }
}

/// Clamps a list limit: `None`/`0` use `default`, larger values cap at `max`.
pub fn normalize_limit(limit: Option<u32>, default: u32, max: u32) -> u32 {
    match limit {
        None | Some(0) => default,
        Some(value) => value.min(max),
    }
}

pub(crate) fn ensure_tables(conn: &Connection, tables: &[&'static str]) -> RepoResult<()> {
    for table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [*table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(*table));
        }
    }
    Ok(())
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    i64::from(value)
}

pub(crate) fn int_to_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean `{other}` in {column}"
        ))),
    }
}

pub(crate) const NOW_MS_SQL: &str =
    "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

#[cfg(test)]
mod tests {
    use super::{normalize_limit, SortOrder};

    const COLUMNS: &[&str] = &["id", "created_at", "description"];

    #[test]
    fn sort_order_parses_direction_prefix() {
        let order = SortOrder::parse("-description", COLUMNS);
        assert_eq!(order.field, "description");
        assert!(order.descending);

        let order = SortOrder::parse("id", COLUMNS);
        assert_eq!(order.field, "id");
        assert!(!order.descending);
    }

    #[test]
    fn unknown_sort_field_falls_back_to_newest_first() {
        assert_eq!(
            SortOrder::parse("-; DROP TABLE notes", COLUMNS),
            SortOrder::NEWEST_FIRST
        );
        assert_eq!(SortOrder::parse("", COLUMNS), SortOrder::NEWEST_FIRST);
    }

    #[test]
    fn order_by_uses_id_as_tie_breaker() {
        assert_eq!(
            SortOrder::NEWEST_FIRST.order_by_sql(),
            " ORDER BY created_at DESC, id DESC"
        );
    }

    #[test]
    fn limits_default_and_cap() {
        assert_eq!(normalize_limit(None, 50, 200), 50);
        assert_eq!(normalize_limit(Some(0), 50, 200), 50);
        assert_eq!(normalize_limit(Some(500), 50, 200), 200);
        assert_eq!(normalize_limit(Some(7), 50, 200), 7);
    }
}
