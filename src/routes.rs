//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`  - Short link redirect or OGP preview (public)
//! - `GET  /health`  - Health check: store, cache, view queue (public)
//! - `/api/*`        - REST API (Bearer token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (proxy-aware when configured)
//! - **Authentication** - Bearer token on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes and middleware without path normalization.
///
/// Handlers read the peer address through `ConnectInfo`, so the router must
/// be served with `into_make_service_with_connect_info` (or wrapped in
/// `MockConnectInfo` in tests).
pub fn build_router(state: AppState) -> Router {
    let behind_proxy = state.behind_proxy;

    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let api_router = rate_limit::apply(api_router, rate_limit::API, behind_proxy);

    let public_router = Router::new()
        .route("/health", get(health_handler))
        .route("/{slug}", get(redirect_handler));
    let public_router = rate_limit::apply(public_router, rate_limit::PUBLIC, behind_proxy);

    Router::new()
        .nest("/api", api_router)
        .merge(public_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Trailing slashes are trimmed before routing, so `/abc123/` resolves like
/// `/abc123`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
