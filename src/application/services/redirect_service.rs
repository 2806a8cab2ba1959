//! Cache-aside redirect engine.
//!
//! Resolves a slug to its destination through the volatile cache first and the
//! durable store second, repopulating the cache on a miss. Attaches optional
//! OGP metadata and hands a page view to the background worker without
//! waiting on it.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::domain::entities::Ogp;
use crate::domain::repositories::{OgpRepository, PageRepository};
use crate::domain::view_event::PageViewEvent;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::user_agent::{AgentInfo, classify};

/// Request attributes of the visitor following a short link.
#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// How a resolved slug should be answered.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectOutcome {
    /// Plain temporary redirect.
    Redirect { url: String },
    /// HTML page carrying OGP tags that forwards to `url`.
    Preview { url: String, ogp: Ogp },
}

/// Picks the response for a resolved destination.
///
/// | OGP resolved | outcome  |
/// |--------------|----------|
/// | yes          | Preview  |
/// | no           | Redirect |
pub fn decide(url: String, ogp: Option<Ogp>) -> RedirectOutcome {
    match ogp {
        Some(ogp) => RedirectOutcome::Preview { url, ogp },
        None => RedirectOutcome::Redirect { url },
    }
}

/// Returns true if a visit by this agent counts as a page view.
pub fn counts_as_view(agent: &AgentInfo) -> bool {
    !agent.is_bot
}

/// Redirect engine.
pub struct RedirectService {
    pages: Arc<dyn PageRepository>,
    ogps: Arc<dyn OgpRepository>,
    cache: Arc<dyn CacheService>,
    view_sender: mpsc::Sender<PageViewEvent>,
}

impl RedirectService {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        ogps: Arc<dyn OgpRepository>,
        cache: Arc<dyn CacheService>,
        view_sender: mpsc::Sender<PageViewEvent>,
    ) -> Self {
        Self {
            pages,
            ogps,
            cache,
            view_sender,
        }
    }

    /// Resolves `slug` for a visitor.
    ///
    /// Cache failures are logged and treated as misses. A page view is queued
    /// for every non-crawler visit; a full or closed queue drops it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is neither cached nor stored.
    /// Returns [`AppError::Internal`] if the page lookup fails in the store.
    pub async fn resolve(&self, slug: &str, visitor: &Visitor) -> Result<RedirectOutcome, AppError> {
        let cached_url = self.cached_url(slug).await;

        let (url, ogp_in_hand) = match cached_url {
            Some(url) => (url, None),
            None => {
                let page = self.pages.find_by_slug(slug).await?.ok_or_else(|| {
                    AppError::not_found(
                        "The URL you are looking for is not found.",
                        json!({ "slug": slug }),
                    )
                })?;

                if let Err(e) = self.cache.set_url(slug, &page.url).await {
                    warn!(slug, error = %e, "Failed to cache URL");
                }
                if let Some(ogp) = &page.ogp
                    && let Err(e) = self.cache.set_ogp_id(slug, ogp.id).await
                {
                    warn!(slug, error = %e, "Failed to cache OGP id");
                }

                (page.url, page.ogp)
            }
        };

        let ogp = match ogp_in_hand {
            Some(ogp) => Some(ogp),
            None => self.cached_ogp(slug).await,
        };

        self.record_view(slug, visitor);

        Ok(decide(url, ogp))
    }

    async fn cached_url(&self, slug: &str) -> Option<String> {
        match self.cache.get_url(slug).await {
            Ok(url) => url,
            Err(e) => {
                warn!(slug, error = %e, "Cache lookup failed, falling back to store");
                None
            }
        }
    }

    /// Loads the OGP referenced by the cached id, if any.
    async fn cached_ogp(&self, slug: &str) -> Option<Ogp> {
        let ogp_id = match self.cache.get_ogp_id(slug).await {
            Ok(id) => id,
            Err(e) => {
                warn!(slug, error = %e, "OGP id lookup failed");
                0
            }
        };

        if ogp_id == 0 {
            return None;
        }

        match self.ogps.find_by_id(ogp_id).await {
            Ok(Some(ogp)) => Some(ogp),
            Ok(None) => {
                debug!(slug, ogp_id, "Cached OGP id is stale, removing");
                if let Err(e) = self.cache.delete_ogp_id(slug).await {
                    warn!(slug, error = %e, "Failed to remove stale OGP id");
                }
                None
            }
            Err(e) => {
                warn!(slug, ogp_id, error = %e, "OGP fetch failed, serving plain redirect");
                None
            }
        }
    }

    fn record_view(&self, slug: &str, visitor: &Visitor) {
        let agent = classify(visitor.user_agent.as_deref());
        if !counts_as_view(&agent) {
            debug!(slug, "Crawler visit, not recorded");
            return;
        }

        let event = PageViewEvent::new(
            slug.to_string(),
            visitor.ip.clone(),
            visitor.referer.as_deref(),
            agent,
        );

        if let Err(e) = self.view_sender.try_send(event) {
            warn!(slug, error = %e, "Page view dropped");
        }
    }
}
