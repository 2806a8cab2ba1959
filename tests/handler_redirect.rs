mod common;

use axum::http::StatusCode;
use common::{BROWSER_UA, CRAWLER_UA, OWNER_TOKEN, TestApp};
use ogp_shortener::infrastructure::cache::CacheService;
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_redirect_success() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/target" }))
        .await;
    let slug = page["slug"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/{slug}"))
        .add_header("User-Agent", BROWSER_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/target");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = TestApp::new().await;

    let response = app.server.get("/nope42").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_renders_preview_for_ogp_page() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/launch",
            "ogp": { "title": "Launch day", "image": "", "description": "Big news" }
        }))
        .await;
    let slug = page["slug"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/{slug}"))
        .add_header("User-Agent", CRAWLER_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.text();
    assert!(body.contains("og:title"));
    assert!(body.contains("content=\"Launch day\""));
    assert!(body.contains("content=\"Big news\""));
    assert!(body.contains("http-equiv=\"refresh\""));
}

#[tokio::test]
async fn test_redirect_escapes_ogp_markup() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/x",
            "ogp": { "title": "<script>alert(1)</script>" }
        }))
        .await;
    let slug = page["slug"].as_str().unwrap();

    let response = app.server.get(&format!("/{slug}")).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(!response.text().contains("<script>"));
}

#[tokio::test]
async fn test_redirect_records_view_for_browser() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/counted" }))
        .await;
    let slug = page["slug"].as_str().unwrap().to_string();

    app.server
        .get(&format!("/{slug}"))
        .add_header("User-Agent", BROWSER_UA)
        .add_header("Referer", "https://news.example.org/")
        .await;

    assert_eq!(app.wait_for_views(1).await, 1);
    let view = &app.store.page_views()[0];
    assert_eq!(view.slug, slug);
    assert_eq!(view.real_ip.as_deref(), Some("127.0.0.1"));
    assert_eq!(view.referer.as_deref(), Some("https://news.example.org/"));
    assert_eq!(view.browser_name.as_deref(), Some("Chrome"));
    assert!(!view.mobile);
}

#[tokio::test]
async fn test_redirect_skips_view_for_crawler() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/bots" }))
        .await;
    let slug = page["slug"].as_str().unwrap();

    let response = app
        .server
        .get(&format!("/{slug}"))
        .add_header("User-Agent", CRAWLER_UA)
        .await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert!(app.store.page_views().is_empty());
}

#[tokio::test]
async fn test_redirect_falls_back_to_store_after_cache_eviction() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/evicted",
            "ogp": { "title": "Still here" }
        }))
        .await;
    let slug = page["slug"].as_str().unwrap();

    app.cache.clear();

    let response = app.server.get(&format!("/{slug}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("content=\"Still here\""));

    assert_eq!(
        app.cache.get_url(slug).await.unwrap().as_deref(),
        Some("https://example.com/evicted")
    );
    assert!(app.cache.get_ogp_id(slug).await.unwrap() > 0);
}

#[tokio::test]
async fn test_redirect_follows_updated_url() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/old" }))
        .await;
    let slug = page["slug"].as_str().unwrap();
    let id = page["id"].as_i64().unwrap();

    app.server.get(&format!("/{slug}")).await;

    app.server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "https://example.com/new" }))
        .await
        .assert_status_ok();

    let response = app.server.get(&format!("/{slug}")).await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/new");
}

#[tokio::test]
async fn test_redirect_after_ogp_removed_is_plain() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/promo",
            "ogp": { "title": "Promo" }
        }))
        .await;
    let slug = page["slug"].as_str().unwrap();
    let id = page["id"].as_i64().unwrap();

    assert_eq!(
        app.server.get(&format!("/{slug}")).await.status_code(),
        StatusCode::OK
    );

    let updated = app
        .server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "https://example.com/promo" }))
        .await;
    updated.assert_status_ok();
    assert!(updated.json::<serde_json::Value>()["ogp"].is_null());

    let response = app.server.get(&format!("/{slug}")).await;
    assert_eq!(response.status_code(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/promo");
}

#[tokio::test]
async fn test_preview_survives_update_past_original_expiry() {
    let app = TestApp::with_cache_ttl(Duration::from_millis(400)).await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/launch",
            "ogp": { "title": "Launch" }
        }))
        .await;
    let slug = page["slug"].as_str().unwrap();
    let id = page["id"].as_i64().unwrap();

    tokio::time::sleep(Duration::from_millis(250)).await;
    app.server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({
            "url": "https://example.com/launch-v2",
            "ogp": { "title": "Launch v2" }
        }))
        .await
        .assert_status_ok();

    // The entries written at creation have expired; the refreshed ones have not.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(app.cache.get_url(slug).await.unwrap().is_some());

    let response = app
        .server
        .get(&format!("/{slug}"))
        .add_header("User-Agent", CRAWLER_UA)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("content=\"Launch v2\""));
}
