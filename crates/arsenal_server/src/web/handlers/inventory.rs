//! Read and write endpoints for item progress.

use crate::web::error::AppError;
use crate::web::form::decode_submission;
use crate::web::state::AppState;
use arsenal_core::{apply_submission, load_inventory};
use axum::extract::{Request, State};
use axum::response::{Html, Redirect};
use log::debug;
use std::sync::Arc;

/// Inventory page: GET /
///
/// Lists every item grouped by category with its two flags.
pub async fn inventory_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let view = state.with_connection(|conn| load_inventory(conn)).await?;
    debug!(
        "event=inventory_view module=web status=ok categories={} items={}",
        view.categories.len(),
        view.total
    );
    Ok(Html(state.renderer().index(&view)?))
}

/// Submission endpoint: POST /
///
/// Applies either a full reconciliation or a bulk import, then redirects
/// back to the inventory page. Undecodable imports are dropped silently.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Redirect, AppError> {
    let submission = decode_submission(request).await?;
    state
        .with_connection(move |conn| apply_submission(conn, &submission))
        .await?;
    Ok(Redirect::to("/"))
}
