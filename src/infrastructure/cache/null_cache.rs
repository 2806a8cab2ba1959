//! No-op cache implementation for disabled caching.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use tracing::debug;

/// A cache implementation that does nothing.
///
/// Every read is a miss, so each redirect goes to the durable store. Used when
/// caching is disabled or Redis cannot be reached at startup.
pub struct NullCache;

impl NullCache {
    /// Creates a new NullCache instance.
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_url(&self, _slug: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(&self, _slug: &str, _url: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn get_ogp_id(&self, _slug: &str) -> CacheResult<i64> {
        Ok(0)
    }

    async fn set_ogp_id(&self, _slug: &str, _ogp_id: i64) -> CacheResult<()> {
        Ok(())
    }

    async fn delete_ogp_id(&self, _slug: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();

        cache.set_url("abc123", "https://example.com").await.unwrap();
        cache.set_ogp_id("abc123", 9).await.unwrap();

        assert_eq!(cache.get_url("abc123").await.unwrap(), None);
        assert_eq!(cache.get_ogp_id("abc123").await.unwrap(), 0);
        assert!(cache.health_check().await);
    }
}
