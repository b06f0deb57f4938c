mod backstage;
mod health;
pub mod ip;
mod search;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // The home page and its script are plain static files; anything that is
    // not an application route falls through to them.
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/search", get(search::search))
        .route("/backstage", get(backstage::backstage))
        .route("/healthz", get(health::healthz))
        .fallback_service(static_files)
        .with_state(state)
}
