//! Redis-backed cache implementation.

use std::future::Future;
use std::time::Duration;

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::ConnectionManager};
use tracing::{debug, info};

const URL_PREFIX: &str = "url:";
const OGP_PREFIX: &str = "ogp:";

/// Redis cache implementation for fast redirect lookups.
///
/// Uses connection pooling via `ConnectionManager` for efficient connection reuse.
/// Every command runs under a finite timeout so a stalled Redis cannot hold up
/// a redirect; failures and timeouts are returned as [`CacheError`] for the
/// caller to log and treat as a miss.
pub struct RedisCache {
    client: ConnectionManager,
    ttl_seconds: u64,
    op_timeout: Duration,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - TTL applied to every cached entry (`CACHE_TTL_SECONDS`)
    /// - `op_timeout` - Upper bound for a single command (`CACHE_TIMEOUT_MS`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(
        redis_url: &str,
        ttl_seconds: u64,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = tokio::time::timeout(op_timeout * 10, ConnectionManager::new(client))
            .await
            .map_err(|_| CacheError::ConnectionError("Timed out connecting to Redis".into()))?
            .map_err(|e| {
                CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
            })?;

        let cache = Self {
            client: manager,
            ttl_seconds,
            op_timeout,
        };

        let mut conn = cache.client.clone();
        cache
            .run("PING", "", conn.ping::<()>())
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(cache)
    }

    fn url_key(slug: &str) -> String {
        format!("{URL_PREFIX}{slug}")
    }

    fn ogp_key(slug: &str) -> String {
        format!("{OGP_PREFIX}{slug}")
    }

    /// Awaits a Redis command under the configured timeout.
    async fn run<T, F>(&self, op: &'static str, key: &str, fut: F) -> CacheResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::OperationError(format!("{op} {key}: {e}"))),
            Err(_) => Err(CacheError::Timeout(format!(
                "{op} {key} after {}ms",
                self.op_timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        let key = Self::url_key(slug);
        let mut conn = self.client.clone();

        let url = self
            .run("GET", &key, conn.get::<_, Option<String>>(&key))
            .await?;

        match &url {
            Some(url) => debug!("Cache HIT: {} -> {}", slug, url),
            None => debug!("Cache MISS: {}", slug),
        }

        Ok(url)
    }

    async fn set_url(&self, slug: &str, url: &str) -> CacheResult<()> {
        let key = Self::url_key(slug);
        let mut conn = self.client.clone();

        self.run(
            "SET",
            &key,
            conn.set_ex::<_, _, ()>(&key, url, self.ttl_seconds),
        )
        .await?;

        debug!("Cache SET: {} -> {} (TTL: {}s)", slug, url, self.ttl_seconds);
        Ok(())
    }

    async fn get_ogp_id(&self, slug: &str) -> CacheResult<i64> {
        let key = Self::ogp_key(slug);
        let mut conn = self.client.clone();

        let id = self
            .run("GET", &key, conn.get::<_, Option<i64>>(&key))
            .await?;

        Ok(id.unwrap_or(0))
    }

    async fn set_ogp_id(&self, slug: &str, ogp_id: i64) -> CacheResult<()> {
        let key = Self::ogp_key(slug);
        let mut conn = self.client.clone();

        self.run(
            "SET",
            &key,
            conn.set_ex::<_, _, ()>(&key, ogp_id, self.ttl_seconds),
        )
        .await?;

        debug!("Cache SET: {} -> ogp #{}", slug, ogp_id);
        Ok(())
    }

    async fn delete_ogp_id(&self, slug: &str) -> CacheResult<()> {
        let key = Self::ogp_key(slug);
        let mut conn = self.client.clone();

        let deleted = self.run("DEL", &key, conn.del::<_, i32>(&key)).await?;
        if deleted > 0 {
            debug!("Cache DEL: {}", key);
        }

        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        self.run("PING", "", conn.ping::<()>()).await.is_ok()
    }
}
