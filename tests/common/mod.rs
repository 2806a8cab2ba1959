#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use ogp_shortener::application::services::{
    AuthService, PageService, RedirectService, hash_token,
};
use ogp_shortener::domain::repositories::TokenRepository;
use ogp_shortener::domain::view_worker::run_view_worker;
use ogp_shortener::infrastructure::cache::{CacheService, MemoryCache};
use ogp_shortener::infrastructure::persistence::InMemoryStore;
use ogp_shortener::routes::build_router;
use ogp_shortener::state::AppState;
use ogp_shortener::utils::slug_generator::RandomSlugGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const OWNER_TOKEN: &str = "owner-token-0123456789";
pub const OTHER_TOKEN: &str = "other-token-0123456789";

pub const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const CRAWLER_UA: &str =
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

/// Inserts a fixed `ConnectInfo` so handlers and the rate limiter see a peer.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A running application backed by the in-memory store and cache.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub owner_id: i64,
    pub other_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(Duration::from_secs(3600), None).await
    }

    /// Uses a memory cache whose entries expire after `ttl`.
    pub async fn with_cache_ttl(ttl: Duration) -> Self {
        Self::build(ttl, None).await
    }

    /// Serves through `cache` instead of the memory cache.
    pub async fn with_cache(cache: Arc<dyn CacheService>) -> Self {
        Self::build(Duration::from_secs(3600), Some(cache)).await
    }

    async fn build(ttl: Duration, cache_override: Option<Arc<dyn CacheService>>) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let cache = Arc::new(MemoryCache::new(1_000, ttl));
        let active: Arc<dyn CacheService> = cache_override.unwrap_or_else(|| cache.clone());
        let (tx, rx) = mpsc::channel(100);

        tokio::spawn(run_view_worker(rx, store.clone(), 4));

        let owner_id = seed_user(&store, "Owner", "owner@example.com", "owner", OWNER_TOKEN).await;
        let other_id = seed_user(&store, "Other", "other@example.com", "other", OTHER_TOKEN).await;

        let redirect_service = Arc::new(RedirectService::new(
            store.clone(),
            store.clone(),
            active.clone(),
            tx.clone(),
        ));
        let page_service = Arc::new(PageService::new(
            store.clone(),
            active.clone(),
            Arc::new(RandomSlugGenerator),
        ));
        let auth_service = Arc::new(AuthService::new(
            store.clone(),
            SIGNING_SECRET.to_string(),
        ));

        let state = AppState {
            redirect_service,
            page_service,
            auth_service,
            cache: active,
            view_sender: tx,
            behind_proxy: false,
        };

        let app = build_router(state).layer(MockConnectInfoLayer);
        let server = TestServer::new(app).unwrap();

        Self {
            server,
            store,
            cache,
            owner_id,
            other_id,
        }
    }

    /// Creates a page as the owner and returns the response body.
    pub async fn create_page(&self, body: serde_json::Value) -> serde_json::Value {
        let response = self
            .server
            .post("/api/pages")
            .authorization_bearer(OWNER_TOKEN)
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<serde_json::Value>()
    }

    /// Waits until the view worker has persisted `expected` views.
    pub async fn wait_for_views(&self, expected: usize) -> usize {
        for _ in 0..50 {
            let count = self.store.page_views().len();
            if count >= expected {
                return count;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.store.page_views().len()
    }
}

async fn seed_user(store: &InMemoryStore, name: &str, email: &str, token_name: &str, raw: &str) -> i64 {
    let user = store.create_user(name, email).await.unwrap();
    store
        .create_token(user.id, token_name, &hash_token(SIGNING_SECRET, raw))
        .await
        .unwrap();
    user.id
}
