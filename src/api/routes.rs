//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_page_handler, get_page_handler, list_pages_handler, update_page_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET   /pages`      - List the caller's pages
/// - `POST  /pages`      - Create a page
/// - `GET   /pages/{id}` - Get one of the caller's pages
/// - `PATCH /pages/{id}` - Replace the URL and reconcile OGP
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/pages", get(list_pages_handler).post(create_page_handler))
        .route("/pages/{id}", get(get_page_handler).patch(update_page_handler))
}
