//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{AuthService, PageService, RedirectService};
use crate::domain::view_event::PageViewEvent;
use crate::infrastructure::cache::CacheService;

/// Shared state, cloned per request.
///
/// Services are held behind `Arc` so cloning is cheap. `cache` and
/// `view_sender` are also handed to the services; the copies here serve the
/// health endpoint.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub page_service: Arc<PageService>,
    pub auth_service: Arc<AuthService>,
    pub cache: Arc<dyn CacheService>,
    pub view_sender: mpsc::Sender<PageViewEvent>,
    /// Trust `X-Forwarded-For` / `X-Real-IP` when resolving the visitor IP.
    pub behind_proxy: bool,
}
