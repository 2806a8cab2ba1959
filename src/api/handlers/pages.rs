//! Handlers for page management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::page::{
    CreatePageRequest, PageListResponse, PageResponse, UpdatePageRequest,
};
use crate::application::services::AuthenticatedUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a page owned by the caller.
///
/// # Endpoint
///
/// `POST /api/pages`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/launch",
///   "ogp": { "title": "Launch", "image": "https://cdn.example.com/l.png", "description": "" }
/// }
/// ```
///
/// # Responses
///
/// - **201 Created** with the page
/// - **400 Bad Request** if the URL is empty or not absolute http(s)
pub async fn create_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(payload): Json<CreatePageRequest>,
) -> Result<(StatusCode, Json<PageResponse>), AppError> {
    payload.validate()?;

    let page = state
        .page_service
        .create_page(user.user_id, &payload.url, payload.ogp.map(Into::into))
        .await?;

    Ok((StatusCode::CREATED, Json(page.into())))
}

/// Lists the caller's pages, newest first.
///
/// # Endpoint
///
/// `GET /api/pages`
pub async fn list_pages_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<PageListResponse>, AppError> {
    let pages = state.page_service.list_pages(user.user_id).await?;

    Ok(Json(PageListResponse {
        total: pages.len(),
        items: pages.into_iter().map(PageResponse::from).collect(),
    }))
}

/// Returns one of the caller's pages.
///
/// # Endpoint
///
/// `GET /api/pages/{id}`
///
/// # Responses
///
/// - **200 OK** with the page
/// - **403 Forbidden** if another user owns it
/// - **404 Not Found** if it doesn't exist
pub async fn get_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<PageResponse>, AppError> {
    let page = state.page_service.get_page(id, user.user_id).await?;
    Ok(Json(page.into()))
}

/// Replaces the destination URL of a page and reconciles its OGP.
///
/// # Endpoint
///
/// `PATCH /api/pages/{id}`
///
/// # Responses
///
/// - **200 OK** with the updated page
/// - **400 Bad Request** if the URL is invalid
/// - **403 Forbidden** if another user owns it
/// - **404 Not Found** if it doesn't exist
pub async fn update_page_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePageRequest>,
) -> Result<Json<PageResponse>, AppError> {
    // Ownership is decided before the body is looked at.
    state.page_service.get_page(id, user.user_id).await?;
    payload.validate()?;

    let page = state
        .page_service
        .update_page(id, user.user_id, &payload.url, payload.ogp.map(Into::into))
        .await?;

    Ok(Json(page.into()))
}
