//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the progress-store operations over the `items` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `ensure_exists` never resets flags of an existing row.
//! - `get_all` order is total and stable: `category`, then `name`, BINARY.
//! - `bulk_set_by_name` with an empty set issues no SQL at all.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::item::{FlagState, Item, ItemKey, ItemValidationError};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on bound parameters per `IN (...)` statement.
const BULK_CHUNK_SIZE: usize = 500;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
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

/// Progress-store operations.
pub trait ItemRepository {
    /// Inserts the key with both flags unset when absent.
    ///
    /// Returns `true` when a row was inserted, `false` when it already existed.
    fn ensure_exists(&self, key: &ItemKey) -> RepoResult<bool>;
    /// Returns every item ordered by category, then name.
    fn get_all(&self) -> RepoResult<Vec<Item>>;
    /// Overwrites both flags of one item.
    ///
    /// Returns `false` when no row has this key; that is not an error.
    fn set_flags(&self, key: &ItemKey, flags: FlagState) -> RepoResult<bool>;
    /// Marks every row whose name is in `names` as blueprint owned and
    /// mastered, in any category.
    ///
    /// Returns the number of rows affected.
    fn bulk_set_by_name(&self, names: &BTreeSet<String>) -> RepoResult<usize>;
    /// Returns the distinct item names known to the store.
    fn list_names(&self) -> RepoResult<BTreeSet<String>>;
}

/// SQLite-backed item repository.
///
/// Borrows a connection; pass a `Transaction` (it dereferences to
/// `Connection`) to group several calls atomically.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn ensure_exists(&self, key: &ItemKey) -> RepoResult<bool> {
        key.validate()?;

        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO items (category, name) VALUES (?1, ?2);",
            params![key.category.as_str(), key.name.as_str()],
        )?;
        Ok(inserted > 0)
    }

    fn get_all(&self) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT category, name, blueprint, mastered
             FROM items
             ORDER BY category COLLATE BINARY ASC, name COLLATE BINARY ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn set_flags(&self, key: &ItemKey, flags: FlagState) -> RepoResult<bool> {
        Item::with_flags(key.category.as_str(), key.name.as_str(), flags).validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET blueprint = ?1, mastered = ?2
             WHERE category = ?3 AND name = ?4;",
            params![
                bool_to_int(flags.blueprint),
                bool_to_int(flags.mastered),
                key.category.as_str(),
                key.name.as_str(),
            ],
        )?;
        Ok(changed > 0)
    }

    fn bulk_set_by_name(&self, names: &BTreeSet<String>) -> RepoResult<usize> {
        if names.is_empty() {
            return Ok(0);
        }

        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut affected = 0;
        for chunk in names.chunks(BULK_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "UPDATE items SET blueprint = 1, mastered = 1 WHERE name IN ({placeholders});"
            );
            affected += self.conn.execute(&sql, params_from_iter(chunk.iter()))?;
        }
        Ok(affected)
    }

    fn list_names(&self) -> RepoResult<BTreeSet<String>> {
        let mut stmt = self.conn.prepare("SELECT DISTINCT name FROM items;")?;
        let mut rows = stmt.query([])?;
        let mut names = BTreeSet::new();
        while let Some(row) = rows.next()? {
            names.insert(row.get::<_, String>(0)?);
        }
        Ok(names)
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let category: String = row.get("category")?;
    let name: String = row.get("name")?;
    let blueprint = parse_flag(row.get("blueprint")?, "blueprint", &category, &name)?;
    let mastered = parse_flag(row.get("mastered")?, "mastered", &category, &name)?;

    let item = Item {
        category,
        name,
        blueprint,
        mastered,
    };
    item.validate()
        .map_err(|err| RepoError::InvalidData(err.to_string()))?;
    Ok(item)
}

fn parse_flag(value: i64, column: &str, category: &str, name: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in items row `{category}/{name}`"
        ))),
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
