use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::AppError;
use crate::redirect::build_redirect_url;
use crate::routes::ip::{PeerIp, client_address};
use crate::state::AppState;
use crate::store::ClientInfo;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
}

/// 302 with an explicit Location header. axum's `Redirect::to` emits 303,
/// but this service's contract is a plain 302.
fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

/// `GET /search?q=…` — log the query, then hand the client to IMDb.
///
/// A blank or missing query is not an error: the client goes back to the
/// home page and nothing is logged. A failed append is: the client gets a
/// generic 500 instead of a redirect, so the audit log never silently
/// misses a search that IMDb saw.
pub async fn search(
    State(state): State<AppState>,
    PeerIp(peer_ip): PeerIp,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let query = params.q.as_deref().map_or("", str::trim);
    if query.is_empty() {
        return Ok(found("/"));
    }

    let client = ClientInfo {
        source_address: client_address(&headers, state.trust_proxy, peer_ip.as_deref()),
        user_agent: headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
    };
    state.store.append(query, &client).await?;
    Ok(found(build_redirect_url(query).as_str()))
}
