//! In-process cache backed by moka.

use std::time::Duration;

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

/// Bounded in-process cache with a time-to-live.
///
/// Suitable for single-instance deployments and tests. Each process has its
/// own copy, so with several instances a mutation only refreshes the instance
/// that handled it; the others converge when their entries expire.
#[derive(Clone)]
pub struct MemoryCache {
    urls: Cache<String, String>,
    ogp_ids: Cache<String, i64>,
}

impl MemoryCache {
    /// Creates a cache holding up to `capacity` entries per key space.
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        debug!(capacity, ttl_secs = ttl.as_secs(), "Using in-memory cache");
        Self {
            urls: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            ogp_ids: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.urls.invalidate_all();
        self.ogp_ids.invalidate_all();
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(3600))
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        Ok(self.urls.get(slug).await)
    }

    async fn set_url(&self, slug: &str, url: &str) -> CacheResult<()> {
        self.urls.insert(slug.to_string(), url.to_string()).await;
        Ok(())
    }

    async fn get_ogp_id(&self, slug: &str) -> CacheResult<i64> {
        Ok(self.ogp_ids.get(slug).await.unwrap_or(0))
    }

    async fn set_ogp_id(&self, slug: &str, ogp_id: i64) -> CacheResult<()> {
        self.ogp_ids.insert(slug.to_string(), ogp_id).await;
        Ok(())
    }

    async fn delete_ogp_id(&self, slug: &str) -> CacheResult<()> {
        self.ogp_ids.invalidate(slug).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
