//! Subcommand implementations.

use crate::config::{ImportArgs, SeedArgs, ServerConfig};
use crate::web::{router, AppState};
use anyhow::Context;
use arsenal_core::db::open_db;
use arsenal_core::{
    apply_submission, load_catalog_dir, seed_catalog, NameMatcher, ProgressService, SeedReport,
    SqliteItemRepository, Submission, SubmissionOutcome,
};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Seeds the catalog once, then serves until Ctrl-C.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.db_path.as_path())?);

    let seed_state = Arc::clone(&state);
    let resources_dir = config.resources_dir.clone();
    let report = tokio::task::spawn_blocking(move || {
        seed_state
            .initialize_catalog(&resources_dir)
            .map(SeedReport::clone)
    })
    .await?
    .with_context(|| {
        format!(
            "failed to seed catalog from `{}`",
            config.resources_dir.display()
        )
    })?;
    info!(
        "event=server_start module=server status=seeded lists={} inserted={}",
        report.lists, report.inserted
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!(
        "event=server_start module=server status=listening addr={} db={}",
        config.bind,
        config.db_path.display()
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_stop module=server status=error error={err}");
    }
}

/// Seeds the catalog from `args.resources` into `db_path`.
pub fn seed(db_path: &Path, args: &SeedArgs) -> anyhow::Result<SeedReport> {
    let lists = load_catalog_dir(&args.resources)?;
    let mut conn = open_db(db_path)?;
    Ok(seed_catalog(&mut conn, &lists)?)
}

/// Applies a bulk import from a names file.
///
/// With `--resolve`, names are first matched against the catalog
/// case-insensitively with spaces read as underscores; unmatched lines are
/// counted and dropped.
pub fn import(db_path: &Path, args: &ImportArgs) -> anyhow::Result<SubmissionOutcome> {
    let payload = std::fs::read(&args.file)
        .with_context(|| format!("failed to read `{}`", args.file.display()))?;
    let mut conn = open_db(db_path)?;

    let payload = if args.resolve {
        match std::str::from_utf8(&payload) {
            Ok(text) => {
                let known = ProgressService::new(SqliteItemRepository::new(&conn))
                    .known_names()?;
                let report = NameMatcher::new(known).resolve_text(text);
                info!(
                    "event=import_resolve module=server status=ok matched={} unmatched={}",
                    report.matched.len(),
                    report.unmatched.len()
                );
                report
                    .matched
                    .into_iter()
                    .collect::<Vec<_>>()
                    .join("\n")
                    .into_bytes()
            }
            // Left as-is so the import reports it as undecodable.
            Err(_) => payload,
        }
    } else {
        payload
    };

    Ok(apply_submission(
        &mut conn,
        &Submission::BulkImport(Some(payload)),
    )?)
}
