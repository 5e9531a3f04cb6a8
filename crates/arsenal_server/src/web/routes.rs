//! Route table.

use crate::web::handlers;
use crate::web::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Largest accepted request body; bulk-import files are plain name lists.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::inventory::inventory_page).post(handlers::inventory::submit),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
