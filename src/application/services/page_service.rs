//! Page mutations and owner-scoped reads.
//!
//! Each mutation is one store transaction over the page and its OGP record.
//! The cache is written only after it commits; a crash in between costs at
//! worst a cache miss that the next redirect repairs.

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};
use url::Url;

use crate::domain::entities::{NewPage, OgpFields, Page};
use crate::domain::repositories::PageRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::slug_generator::SlugGenerator;

const MAX_SLUG_ATTEMPTS: usize = 10;

/// Longest destination URL accepted.
pub const MAX_URL_LENGTH: usize = 2048;

/// Checks that `raw` is a non-empty absolute http(s) URL of at most
/// [`MAX_URL_LENGTH`] bytes and returns it trimmed.
///
/// # Errors
///
/// Returns [`AppError::Validation`] otherwise.
pub fn validate_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(
            "URL must not be empty",
            json!({ "field": "url" }),
        ));
    }

    if trimmed.len() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            "URL is too long",
            json!({ "field": "url", "max": MAX_URL_LENGTH }),
        ));
    }

    let parsed = Url::parse(trimmed).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(AppError::bad_request(
            "URL must be an absolute http or https address",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    // Keep the owner's spelling when it can go into a Location header as is.
    if trimmed.bytes().all(|b| b.is_ascii_graphic()) {
        Ok(trimmed.to_string())
    } else {
        Ok(parsed.to_string())
    }
}

/// Service for creating, updating and reading pages.
pub struct PageService {
    pages: Arc<dyn PageRepository>,
    cache: Arc<dyn CacheService>,
    slugs: Arc<dyn SlugGenerator>,
}

impl PageService {
    pub fn new(
        pages: Arc<dyn PageRepository>,
        cache: Arc<dyn CacheService>,
        slugs: Arc<dyn SlugGenerator>,
    ) -> Self {
        Self {
            pages,
            cache,
            slugs,
        }
    }

    /// Creates a page under a fresh slug, optionally with OGP metadata.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is empty or not absolute http(s).
    /// Returns [`AppError::Internal`] if no free slug was found or the store fails.
    pub async fn create_page(
        &self,
        owner_id: i64,
        url: &str,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError> {
        let url = validate_url(url)?;
        let page = self.insert_with_unique_slug(owner_id, url, ogp).await?;

        self.cache_page(&page).await;

        info!(page_id = page.id, slug = %page.slug, owner_id, "Page created");
        Ok(page)
    }

    /// Replaces the URL of a page and reconciles its OGP record.
    ///
    /// | `ogp` argument | existing record | effect                                |
    /// |----------------|-----------------|---------------------------------------|
    /// | `Some`         | none            | create, cache the new id              |
    /// | `Some`         | present         | update in place, re-cache the same id |
    /// | `None`         | present         | delete record, then its cached id     |
    /// | `None`         | none            | nothing                               |
    ///
    /// The URL and OGP-ID cache entries are always written together so they
    /// share one expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the page doesn't exist.
    /// Returns [`AppError::Forbidden`] if `owner_id` doesn't own it. Nothing is changed.
    /// Returns [`AppError::Validation`] if the URL is invalid.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn update_page(
        &self,
        page_id: i64,
        owner_id: i64,
        url: &str,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError> {
        let page = self.owned_page(page_id, owner_id).await?;
        let url = validate_url(url)?;

        let updated = self.pages.update(page.id, &url, ogp).await?;

        self.cache_page(&updated).await;
        if updated.ogp.is_none()
            && page.ogp.is_some()
            && let Err(e) = self.cache.delete_ogp_id(&updated.slug).await
        {
            warn!(slug = %updated.slug, error = %e, "Failed to remove cached OGP id");
        }

        info!(page_id, slug = %updated.slug, "Page updated");
        Ok(updated)
    }

    /// Returns a page with its OGP for its owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] or [`AppError::Forbidden`].
    pub async fn get_page(&self, page_id: i64, owner_id: i64) -> Result<Page, AppError> {
        self.owned_page(page_id, owner_id).await
    }

    /// Lists the owner's pages, newest first.
    pub async fn list_pages(&self, owner_id: i64) -> Result<Vec<Page>, AppError> {
        self.pages.list_by_user(owner_id).await
    }

    /// Counts all pages. Doubles as a store liveness probe.
    pub async fn count_pages(&self) -> Result<i64, AppError> {
        self.pages.count().await
    }

    async fn owned_page(&self, page_id: i64, owner_id: i64) -> Result<Page, AppError> {
        let page = self
            .pages
            .find_by_id(page_id)
            .await?
            .ok_or_else(|| AppError::not_found("Page not found", json!({ "id": page_id })))?;

        if !page.is_owned_by(owner_id) {
            return Err(AppError::forbidden(
                "You don't have permission to edit it.",
                json!({ "id": page_id }),
            ));
        }

        Ok(page)
    }

    async fn insert_with_unique_slug(
        &self,
        owner_id: i64,
        url: String,
        ogp: Option<OgpFields>,
    ) -> Result<Page, AppError> {
        for _ in 0..MAX_SLUG_ATTEMPTS {
            let new_page = NewPage {
                slug: self.slugs.generate(),
                user_id: owner_id,
                url: url.clone(),
                ogp: ogp.clone(),
            };

            match self.pages.create(new_page).await {
                Err(AppError::Conflict { .. }) => continue,
                other => return other,
            }
        }

        Err(AppError::internal(
            "Failed to generate unique slug",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Writes `slug→URL` and, when the page has OGP, `slug→OGP-ID` after it.
    async fn cache_page(&self, page: &Page) {
        if let Err(e) = self.cache.set_url(&page.slug, &page.url).await {
            warn!(slug = %page.slug, error = %e, "Failed to cache URL");
        }

        if let Some(ogp) = &page.ogp
            && let Err(e) = self.cache.set_ogp_id(&page.slug, ogp.id).await
        {
            warn!(slug = %page.slug, error = %e, "Failed to cache OGP id");
        }
    }
}
