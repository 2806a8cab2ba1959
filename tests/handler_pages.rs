mod common;

use axum::http::StatusCode;
use common::{OTHER_TOKEN, OWNER_TOKEN, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_pages_require_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/pages")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.header("www-authenticate"), "Bearer");
}

#[tokio::test]
async fn test_pages_reject_unknown_token() {
    let app = TestApp::new().await;

    let response = app
        .server
        .get("/api/pages")
        .authorization_bearer("not-a-real-token")
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_page() {
    let app = TestApp::new().await;

    let page = app
        .create_page(json!({
            "url": "https://example.com/launch",
            "ogp": { "title": "Launch", "image": "https://cdn.example.com/l.png", "description": "" }
        }))
        .await;

    let slug = page["slug"].as_str().unwrap();
    assert_eq!(slug.len(), 6);
    assert_eq!(page["short_path"], format!("/{slug}"));
    assert_eq!(page["url"], "https://example.com/launch");
    assert_eq!(page["ogp"]["title"], "Launch");
    assert!(page["ogp"]["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_create_page_rejects_empty_url() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/pages")
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_create_page_rejects_relative_url() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/pages")
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "/just/a/path" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_page_forbidden_for_non_owner() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/mine" }))
        .await;
    let id = page["id"].as_i64().unwrap();
    let slug = page["slug"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OTHER_TOKEN)
        .json(&json!({ "url": "https://evil.example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let json = response.json::<serde_json::Value>();
    assert_eq!(
        json["error"]["message"],
        "You don't have permission to edit it."
    );

    let redirect = app.server.get(&format!("/{slug}")).await;
    assert_eq!(redirect.header("location"), "https://example.com/mine");
}

#[tokio::test]
async fn test_update_missing_page() {
    let app = TestApp::new().await;

    let response = app
        .server
        .patch("/api/pages/9999")
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "https://example.com" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_page_edits_ogp_in_place() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({
            "url": "https://example.com/a",
            "ogp": { "title": "First" }
        }))
        .await;
    let id = page["id"].as_i64().unwrap();
    let ogp_id = page["ogp"]["id"].as_i64().unwrap();

    let response = app
        .server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OWNER_TOKEN)
        .json(&json!({ "url": "https://example.com/b", "ogp": { "title": "Second" } }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["url"], "https://example.com/b");
    assert_eq!(json["ogp"]["id"], ogp_id);
    assert_eq!(json["ogp"]["title"], "Second");
}

#[tokio::test]
async fn test_update_page_invalid_body_from_non_owner_is_forbidden() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/mine" }))
        .await;
    let id = page["id"].as_i64().unwrap();

    let response = app
        .server
        .patch(&format!("/api/pages/{id}"))
        .authorization_bearer(OTHER_TOKEN)
        .json(&json!({ "url": "" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_get_page_forbidden_for_non_owner() {
    let app = TestApp::new().await;
    let page = app
        .create_page(json!({ "url": "https://example.com/private" }))
        .await;
    let id = page["id"].as_i64().unwrap();

    let response = app
        .server
        .get(&format!("/api/pages/{id}"))
        .authorization_bearer(OTHER_TOKEN)
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_list_pages_only_returns_own() {
    let app = TestApp::new().await;
    app.create_page(json!({ "url": "https://example.com/1" })).await;
    app.create_page(json!({ "url": "https://example.com/2" })).await;

    let response = app
        .server
        .get("/api/pages")
        .authorization_bearer(OWNER_TOKEN)
        .await;
    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 2);
    assert_eq!(json["items"][0]["url"], "https://example.com/2");

    let other = app
        .server
        .get("/api/pages")
        .authorization_bearer(OTHER_TOKEN)
        .await;
    assert_eq!(other.json::<serde_json::Value>()["total"], 0);
}
