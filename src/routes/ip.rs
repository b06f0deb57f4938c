use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::http::request::Parts;

/// Axum extractor that resolves the TCP peer IP from `ConnectInfo<SocketAddr>`.
///
/// Returns `None` when `ConnectInfo` is unavailable (e.g. in tests that use
/// `Router::oneshot` without `into_make_service_with_connect_info`).
pub struct PeerIp(pub Option<String>);

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for PeerIp {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ci| ci.0.ip().to_string());
        Ok(Self(ip))
    }
}

/// Best-effort client address for the audit log.
///
/// When `trust_proxy` is true, the first entry of `X-Forwarded-For` wins;
/// otherwise the TCP peer address is used. `None` means no address could be
/// determined, which the store records as an empty `sourceAddress`.
///
/// # Security
///
/// `X-Forwarded-For` is trivially spoofable by clients. Setting
/// `trust_proxy = true` is only safe when the server sits behind a trusted
/// reverse proxy that overwrites the header with the real client IP. In
/// direct-exposure deployments, leave it off — the socket address cannot be
/// spoofed.
pub fn client_address(headers: &HeaderMap, trust_proxy: bool, peer_ip: Option<&str>) -> Option<String> {
    if trust_proxy
        && let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
    {
        return Some(ip);
    }
    peer_ip.map(ToString::to_string)
}
