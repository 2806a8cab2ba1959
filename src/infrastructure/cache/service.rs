//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
///
/// These are soft failures: callers log them and carry on as if the cache
/// returned a miss or the write was a no-op.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
    #[error("Cache operation timed out: {0}")]
    Timeout(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// The volatile tier of the read path.
///
/// Holds two independent key spaces per slug: the destination URL and the id
/// of the page's OGP record (`0` meaning none or unknown). Entries may be
/// evicted at any time; the durable store stays the source of truth.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL
/// - [`crate::infrastructure::cache::MemoryCache`] - In-process cache (moka)
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached destination URL for a slug.
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>>;

    /// Stores or overwrites the destination URL for a slug.
    async fn set_url(&self, slug: &str, url: &str) -> CacheResult<()>;

    /// Returns the cached OGP id for a slug, or `0` if none is cached.
    async fn get_ogp_id(&self, slug: &str) -> CacheResult<i64>;

    /// Stores the OGP id for a slug.
    async fn set_ogp_id(&self, slug: &str, ogp_id: i64) -> CacheResult<()>;

    /// Removes the OGP id mapping for a slug.
    async fn delete_ogp_id(&self, slug: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
