//! Catalog seed source and one-time seeding.

use super::non_blank_lines;
use crate::db::{with_immediate_transaction, DbError};
use crate::model::item::ItemKey;
use crate::repo::item_repo::{ItemRepository, RepoError, SqliteItemRepository};
use log::{info, warn};
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;

const LIST_EXTENSION: &str = "txt";

/// One named list of item names; the name of the list is the category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogList {
    pub category: String,
    pub names: Vec<String>,
}

/// Outcome of one seeding pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Lists processed.
    pub lists: usize,
    /// Names read across all lists, duplicates within a list counted once.
    pub names_seen: usize,
    /// Rows that did not exist before this pass.
    pub inserted: usize,
}

#[derive(Debug)]
pub enum CatalogError {
    Io { path: PathBuf, source: std::io::Error },
    InvalidUtf8(PathBuf),
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read catalog `{}`: {source}", path.display())
            }
            Self::InvalidUtf8(path) => {
                write!(f, "catalog list `{}` is not valid UTF-8", path.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidUtf8(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for CatalogError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(RepoError::Db(DbError::Sqlite(value)))
    }
}

/// Parses one list: every non-empty trimmed line is a name.
///
/// Duplicate lines are kept once, first occurrence wins.
pub fn parse_catalog_list(category: impl Into<String>, text: &str) -> CatalogList {
    let mut names: Vec<String> = Vec::new();
    for name in non_blank_lines(text) {
        if names.iter().any(|seen| seen == name) {
            continue;
        }
        names.push(name.to_string());
    }
    CatalogList {
        category: category.into(),
        names,
    }
}

/// Reads every `*.txt` file in `dir` as a catalog list, in path order.
///
/// The file stem is the category.
pub fn load_catalog_dir(dir: impl AsRef<Path>) -> Result<Vec<CatalogList>, CatalogError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
        let path = entry.map_err(io_error(dir))?.path();
        let is_list = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == LIST_EXTENSION);
        if is_list {
            paths.push(path);
        }
    }
    paths.sort();

    let mut lists = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(category) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(
                "event=catalog_load module=catalog status=skipped reason=non_utf8_stem path={}",
                path.display()
            );
            continue;
        };
        let category = category.to_string();
        let bytes = std::fs::read(&path).map_err(io_error(&path))?;
        let text = String::from_utf8(bytes).map_err(|_| CatalogError::InvalidUtf8(path.clone()))?;
        lists.push(parse_catalog_list(category, &text));
    }
    Ok(lists)
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CatalogError {
    let path = path.to_path_buf();
    move |source| CatalogError::Io { path, source }
}

/// Ensures every `(category, name)` of `lists` exists, in one transaction.
pub fn seed_catalog(
    conn: &mut Connection,
    lists: &[CatalogList],
) -> Result<SeedReport, CatalogError> {
    let started_at = Instant::now();
    let report = with_immediate_transaction(conn, |tx| -> Result<SeedReport, CatalogError> {
        let repo = SqliteItemRepository::new(tx);
        let mut report = SeedReport {
            lists: lists.len(),
            ..SeedReport::default()
        };
        for list in lists {
            for name in &list.names {
                report.names_seen += 1;
                if repo.ensure_exists(&ItemKey::new(list.category.as_str(), name.as_str()))? {
                    report.inserted += 1;
                }
            }
        }
        Ok(report)
    })?;

    info!(
        "event=catalog_seed module=catalog status=ok lists={} names_seen={} inserted={} duration_ms={}",
        report.lists,
        report.names_seen,
        report.inserted,
        started_at.elapsed().as_millis()
    );
    Ok(report)
}

/// Process-wide one-time catalog initialization state.
///
/// The first successful `initialize` seeds the store; later calls return the
/// cached report without touching storage. A failed attempt leaves the state
/// uninitialized so startup can retry or abort.
#[derive(Debug, Default)]
pub struct CatalogInit {
    report: OnceCell<SeedReport>,
}

impl CatalogInit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds once; concurrent callers block until the first one finishes.
    pub fn initialize<F>(&self, seed: F) -> Result<&SeedReport, CatalogError>
    where
        F: FnOnce() -> Result<SeedReport, CatalogError>,
    {
        self.report.get_or_try_init(seed)
    }

    pub fn is_initialized(&self) -> bool {
        self.report.get().is_some()
    }

    pub fn report(&self) -> Option<&SeedReport> {
        self.report.get()
    }
}
