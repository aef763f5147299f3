//! Search resolution against a mock search endpoint and an in-memory cache.

use std::time::Duration;

use fencer_core::{normalize_query, SearchResult};
use fencer_store::{KvStore, MemoryStore, TtlCache};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fencer_scraper::{
    resolve, search_fencers, FencingTrackerClient, RetryPolicy, ScraperConfig, ScraperError,
};

fn test_client(server: &MockServer) -> FencingTrackerClient {
    let config = ScraperConfig::for_base_url(&server.uri())
        .with_retry(RetryPolicy::new(2, Duration::ZERO));
    FencingTrackerClient::new(&config).expect("failed to build test client")
}

fn search_body(variant: &str) -> serde_json::Value {
    json!({"query": variant, "limit": 10})
}

async fn search_keys(store: &MemoryStore) -> Vec<String> {
    store
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .filter(|k| k.starts_with("search:"))
        .collect()
}

#[tokio::test]
async fn walks_variants_until_one_matches() {
    let server = MockServer::start().await;
    let query = "Kiefer, Lee";
    let variants = normalize_query(query).variants;
    assert!(variants.len() > 2, "fixture needs several variants: {variants:?}");

    let (last, earlier) = variants.split_last().unwrap();
    for variant in earlier {
        Mock::given(method("POST"))
            .and(path("/search"))
            .and(body_json(search_body(variant)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(search_body(last)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "9", "name": "Lee Kiefer"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let cache = TtlCache::new(store.clone());
    let resolution = resolve(&test_client(&server), &cache, query).await;

    assert_eq!(resolution.results.len(), 1);
    assert_eq!(resolution.results[0].slug, "Lee-Kiefer");
    assert_eq!(resolution.attempted, variants.len());
    assert_eq!(resolution.failures, 0);
    assert_eq!(
        search_keys(&store).await,
        vec![format!("search:{}", last.to_lowercase())]
    );
}

#[tokio::test]
async fn empty_results_are_not_cached() {
    let server = MockServer::start().await;
    let variants = normalize_query("Nobody").variants;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2 * variants.len() as u64)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let cache = TtlCache::new(store.clone());
    let client = test_client(&server);

    assert!(search_fencers(&client, &cache, "Nobody").await.is_empty());
    assert!(search_fencers(&client, &cache, "Nobody").await.is_empty());
    assert!(search_keys(&store).await.is_empty());
}

#[tokio::test]
async fn cache_hit_skips_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let cached = vec![SearchResult {
        id: "1".to_owned(),
        name: "Ann Smith".to_owned(),
        slug: "Ann-Smith".to_owned(),
        club: "Unknown Club".to_owned(),
        country: "USA".to_owned(),
    }];
    let cache = TtlCache::new(MemoryStore::new());
    cache.set("search:ann smith", &cached).await.unwrap();

    let resolution = resolve(&test_client(&server), &cache, "  ANN   Smith ").await;
    assert_eq!(resolution.results, cached);
    assert_eq!(resolution.attempted, 1);
}

#[tokio::test]
async fn second_call_is_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 3, "name": "Ann Smith"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = TtlCache::new(MemoryStore::new());
    let client = test_client(&server);
    let first = search_fencers(&client, &cache, "Ann Smith").await;
    let second = search_fencers(&client, &cache, "ann smith").await;
    assert_eq!(first, second);
    assert_eq!(first[0].id, "3");
}

#[tokio::test]
async fn failing_variants_are_skipped() {
    let server = MockServer::start().await;
    let variants = normalize_query("Kiefer, Lee").variants;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(search_body(&variants[0])))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(search_body(&variants[1])))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": "9", "name": "Lee Kiefer"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cache = TtlCache::new(MemoryStore::new());
    let resolution = resolve(&test_client(&server), &cache, "Kiefer, Lee").await;
    assert_eq!(resolution.results.len(), 1);
    assert_eq!(resolution.failures, 1);
    assert!(!resolution.all_failed());
}

#[tokio::test]
async fn every_variant_failing_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let cache = TtlCache::new(MemoryStore::new());
    let resolution = resolve(&test_client(&server), &cache, "Kiefer, Lee").await;

    assert!(resolution.results.is_empty());
    assert!(resolution.all_failed());
    assert!(matches!(
        resolution.last_error,
        Some(ScraperError::HttpError { status: 403, .. })
    ));
}
