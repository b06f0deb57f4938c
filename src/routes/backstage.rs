use axum::extract::State;
use axum::response::Html;

use crate::error::AppError;
use crate::report::render_report;
use crate::state::AppState;

/// `GET /backstage` — the audit log as an HTML table, newest first.
///
/// A corrupt log renders as empty (the store absorbs parse failures); only
/// real I/O trouble surfaces as a 500.
pub async fn backstage(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let entries = state.store.read_all().await?;
    Ok(Html(render_report(&entries)))
}
