//! Handler for short link redirects.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use std::net::SocketAddr;

use crate::application::services::{RedirectOutcome, Visitor};
use crate::domain::entities::Ogp;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::resolve_client_ip;

/// Preview page carrying OGP tags that forwards the visitor to `url`.
#[derive(Template, WebTemplate)]
#[template(path = "preview.html")]
pub struct PreviewTemplate {
    pub url: String,
    pub ogp: Ogp,
}

/// Resolves a slug and answers with a redirect or an OGP preview page.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Responses
///
/// - **307 Temporary Redirect** to the destination when the page has no OGP
/// - **200 OK** with an HTML preview when it has OGP metadata
/// - **404 Not Found** if the slug is unknown
///
/// The visitor IP comes from the socket peer, or from `X-Forwarded-For` /
/// `X-Real-IP` when the service runs behind a trusted proxy.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let visitor = Visitor {
        ip: resolve_client_ip(&headers, Some(addr), state.behind_proxy),
        user_agent: header_str(header::USER_AGENT),
        referer: header_str(header::REFERER),
    };

    let response = match state.redirect_service.resolve(&slug, &visitor).await? {
        RedirectOutcome::Redirect { url } => Redirect::temporary(&url).into_response(),
        RedirectOutcome::Preview { url, ogp } => PreviewTemplate { url, ogp }.into_response(),
    };

    Ok(response)
}
