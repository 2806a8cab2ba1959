//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store and view queue up. `status` is `degraded` when only the
///   cache is down, since redirects fall back to the store.
/// - **503 Service Unavailable**: Store or view queue down
///
/// # Components Checked
///
/// 1. **Store**: Counts pages
/// 2. **View Queue**: Checks if the channel is open and reports free slots
/// 3. **Cache**: Backend health probe (PING for Redis)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok", "message": "Connected, 42 pages" },
///     "view_queue": { "status": "ok", "message": "Capacity: 10000" },
///     "cache": { "status": "ok", "message": "Cache reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store = match state.page_service.count_pages().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} pages")),
        Err(e) => CheckStatus::error(format!("Store error: {e}")),
    };

    let view_queue = if state.view_sender.is_closed() {
        CheckStatus::error("View queue is closed")
    } else {
        CheckStatus::ok(format!("Capacity: {}", state.view_sender.capacity()))
    };

    let cache = if state.cache.health_check().await {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache unreachable")
    };

    let serving = store.is_ok() && view_queue.is_ok();
    let healthy = serving && cache.is_ok();

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store,
            view_queue,
            cache,
        },
    };

    if serving {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
