//! Core domain logic for arsenal.
//! This crate is the single source of truth for the item progress invariants.

pub mod catalog;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use catalog::{
    load_catalog_dir, non_blank_lines, normalize_name, parse_catalog_list, seed_catalog,
    CatalogError, CatalogInit, CatalogList, MatchReport, NameMatcher, SeedReport,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::item::{FlagState, Item, ItemKey, ItemValidationError};
pub use repo::item_repo::{ItemRepository, RepoError, RepoResult, SqliteItemRepository};
pub use service::progress_service::{
    apply_submission, load_inventory, parse_import_names, plan_reconciliation,
    BulkImportOutcome, FlagUpdate, ProgressService, ReconcileReport, SubmissionOutcome,
};
pub use service::submission::{marker_key, parse_marker, FlagKind, FlagMarks, Submission};
pub use view::{build_view, CategoryView, InventoryView, ItemView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
