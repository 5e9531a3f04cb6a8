//! Catalog loading and name matching.
//!
//! # Responsibility
//! - Read category lists (one `*.txt` file per category) from a resources
//!   directory.
//! - Seed the progress store idempotently, once per process.
//! - Resolve free-form detected names against known catalog names.
//!
//! # Invariants
//! - Seeding only inserts; it never resets flags of existing rows.
//! - The process-wide seed runs at most once per `CatalogInit`.
//! - Name lists break on `\n`, `\r\n` and bare `\r` alike.

mod matcher;
mod seed;

pub use matcher::{normalize_name, MatchReport, NameMatcher};
pub use seed::{
    load_catalog_dir, parse_catalog_list, seed_catalog, CatalogError, CatalogInit, CatalogList,
    SeedReport,
};

/// Trimmed non-blank lines of a name list.
///
/// A bare `\r` ends a line too, so classic Mac line endings read the same as
/// Unix or Windows ones.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c == '\n' || c == '\r')
        .map(str::trim)
        .filter(|line| !line.is_empty())
}
