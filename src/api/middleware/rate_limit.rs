//! Per-client rate limiting using a token bucket.
//!
//! Clients are keyed by the socket peer address, or by the forwarded client
//! address when the service runs behind a trusted proxy.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

type Limiter<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Bucket parameters for one class of routes.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub per_second: u64,
    pub burst: u32,
}

/// Public routes (redirects, health): 50 req/s with a burst of 200.
///
/// Redirects are the hot path and are often fetched in bursts by link
/// unfurlers.
pub const PUBLIC: Quota = Quota {
    per_second: 50,
    burst: 200,
};

/// Authenticated API routes: 2 req/s with a burst of 20.
pub const API: Quota = Quota {
    per_second: 2,
    burst: 20,
};

/// Wraps `router` in a rate limiter.
///
/// Requests exceeding the quota receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// - `behind_proxy = false`: socket peer IP ([`PeerIpKeyExtractor`])
/// - `behind_proxy = true`: `X-Forwarded-For`, `X-Real-IP`, `Forwarded`, then
///   peer IP ([`SmartIpKeyExtractor`])
///
/// # Example
///
/// ```rust,ignore
/// let api = rate_limit::apply(api_routes(), rate_limit::API, config.behind_proxy);
/// ```
pub fn apply<S>(router: Router<S>, quota: Quota, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(limiter(quota, SmartIpKeyExtractor))
    } else {
        router.layer(limiter(quota, PeerIpKeyExtractor))
    }
}

fn limiter<K: KeyExtractor>(quota: Quota, key_extractor: K) -> Limiter<K> {
    let config = GovernorConfigBuilder::default()
        .per_second(quota.per_second)
        .burst_size(quota.burst)
        .key_extractor(key_extractor)
        .finish()
        .expect("rate limit quota must be non-zero");

    GovernorLayer::new(Arc::new(config))
}
