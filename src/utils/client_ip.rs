//! Client IP resolution honoring reverse proxy headers.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the originating client IP.
///
/// When `behind_proxy` is set, the first valid address in `X-Forwarded-For`
/// wins, then `X-Real-IP`. Otherwise (or when neither header holds a valid
/// address) the socket peer address is used, so direct clients cannot spoof it.
pub fn resolve_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_xff = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    from_xff.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}
