//! Integration tests for `FencingTrackerClient`.
//!
//! Each test stands up a local `wiremock` server, so no real network
//! traffic is made. Retry tests run with a zero backoff.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fencer_scraper::{FencingTrackerClient, ResourceKind, RetryPolicy, ScraperConfig, ScraperError};

/// Production policy (two attempts) with no delay between them.
fn test_client(server: &MockServer) -> FencingTrackerClient {
    let config = ScraperConfig::for_base_url(&server.uri())
        .with_retry(RetryPolicy::new(2, Duration::ZERO));
    FencingTrackerClient::new(&config).expect("failed to build test client")
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_posts_query_and_limit_and_maps_results() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({"query": "Lee Kiefer", "limit": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"usfa_id": 100_123, "name": "Lee Kiefer", "club": "Alliance", "country": "USA"},
            {"id": "200", "name": "Leeanne Kiefer"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = test_client(&server).search("Lee Kiefer").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "100123");
    assert_eq!(results[0].slug, "Lee-Kiefer");
    assert_eq!(results[1].id, "200");
    assert_eq!(results[1].club, "Unknown Club");
    assert_eq!(results[1].country, "USA");
}

#[tokio::test]
async fn search_empty_array_is_ok() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let results = test_client(&server).search("Nobody").await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server).search("Lee Kiefer").await;
    assert!(
        matches!(result, Err(ScraperError::Deserialize { .. })),
        "expected Deserialize, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_is_retried_once_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "A B"}])))
        .expect(1)
        .mount(&server)
        .await;

    let results = test_client(&server).search("A B").await.unwrap();
    assert_eq!(results[0].id, "1");
}

#[tokio::test]
async fn rate_limit_twice_is_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let result = test_client(&server).search("A B").await;
    assert!(
        matches!(result, Err(ScraperError::RateLimited { .. })),
        "expected RateLimited, got: {result:?}"
    );
}

#[tokio::test]
async fn server_error_twice_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/1/Ann-Smith/strength"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_page(ResourceKind::Strength, "1", "Ann-Smith")
        .await;
    assert!(
        matches!(result, Err(ScraperError::ServerError { status: 503, .. })),
        "expected ServerError, got: {result:?}"
    );
}

#[tokio::test]
async fn not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/1/Ann-Smith"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_page(ResourceKind::Profile, "1", "Ann-Smith")
        .await;
    let err = result.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got: {err:?}");
}

#[tokio::test]
async fn other_client_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/1/Ann-Smith/history"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .fetch_page(ResourceKind::History, "1", "Ann-Smith")
        .await;
    assert!(
        matches!(result, Err(ScraperError::HttpError { status: 403, .. })),
        "expected HttpError, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/42/Lee-Kiefer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Lee Kiefer</h1>"))
        .mount(&server)
        .await;

    let html = test_client(&server)
        .fetch_page(ResourceKind::Profile, "42", "Lee-Kiefer")
        .await
        .unwrap();
    assert_eq!(html, "<h1>Lee Kiefer</h1>");
}

#[tokio::test]
async fn slug_with_parentheses_is_requested_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/p/7/Leon%20(Ruibo)-Xiao"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let html = test_client(&server)
        .fetch_page(ResourceKind::Profile, "7", "Leon (Ruibo)-Xiao")
        .await
        .unwrap();
    assert_eq!(html, "ok");
}
