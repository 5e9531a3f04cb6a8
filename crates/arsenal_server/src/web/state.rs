//! Shared application state and request-scoped store access.

use crate::web::error::AppError;
use crate::web::render::PageRenderer;
use arsenal_core::db::open_db;
use arsenal_core::{
    load_catalog_dir, seed_catalog, CatalogError, CatalogInit, RepoError, SeedReport,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// State shared by all handlers.
///
/// Holds the database location, never a connection.
pub struct AppState {
    db_path: PathBuf,
    renderer: PageRenderer,
    catalog: CatalogInit,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            db_path: db_path.into(),
            renderer: PageRenderer::new()?,
            catalog: CatalogInit::new(),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn renderer(&self) -> &PageRenderer {
        &self.renderer
    }

    /// Seeds the catalog from `resources_dir` on the first call only.
    ///
    /// Blocking; call it before serving or from a blocking task.
    pub fn initialize_catalog(&self, resources_dir: &Path) -> Result<&SeedReport, CatalogError> {
        self.catalog.initialize(|| {
            let lists = load_catalog_dir(resources_dir)?;
            let mut conn = open_db(&self.db_path).map_err(|err| CatalogError::Repo(err.into()))?;
            seed_catalog(&mut conn, &lists)
        })
    }

    pub fn catalog_report(&self) -> Option<&SeedReport> {
        self.catalog.report()
    }

    /// Runs `f` on a fresh connection inside a blocking task.
    ///
    /// The connection lives exactly as long as `f`; it is closed when the
    /// task returns, whether `f` succeeded, failed, or panicked.
    pub async fn with_connection<T, F>(&self, f: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, RepoError> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        let result = tokio::task::spawn_blocking(move || -> Result<T, RepoError> {
            let mut conn = open_db(&db_path)?;
            f(&mut conn)
        })
        .await?;
        Ok(result?)
    }
}
