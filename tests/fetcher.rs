//! Cache and fallback behavior of the shared fetcher against a mock API.

use chrono::{Duration, Utc};
use f1_widgets::models::cache::{CacheEntry, Freshness};
use f1_widgets::models::error::Error;
use f1_widgets::models::race::races_from;
use f1_widgets::utils::config::Config;
use f1_widgets::utils::fetcher::{DataSource, FetchRequest};
use f1_widgets::utils::state::AppState;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Nothing listens on the discard port.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn state(api_base: &str, dir: &TempDir) -> AppState {
    let config = Config::with_endpoints(api_base, "http://127.0.0.1:9/img", dir.path().to_path_buf());
    AppState::init(config).expect("build app state")
}

fn races_payload(name: &str) -> Value {
    json!({"MRData": {"RaceTable": {"Races": [{
        "season": "2025",
        "round": "1",
        "raceName": name,
        "date": "2025-03-16",
        "time": "04:00:00Z",
        "Circuit": {"circuitId": "albert_park", "circuitName": "Albert Park Grand Prix Circuit"}
    }]}}})
}

fn validate_races(data: &Value) -> Result<(), Error> {
    races_from(data).map(|_| ())
}

#[tokio::test]
async fn fresh_cache_is_served_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(races_payload("Live GP")))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    let entry = CacheEntry::new(races_payload("Cached GP"), Utc::now() - Duration::minutes(10));
    state.fetcher.store().write("races", &entry).await.unwrap();

    let request = FetchRequest::new(
        state.config.api_url("current.json"),
        "races",
        Duration::hours(1),
    );
    let fetched = state.fetcher.fetch_json(&request).await.unwrap();

    assert_eq!(fetched.data, races_payload("Cached GP"));
    assert!(matches!(fetched.freshness, Freshness::Cached(_)));
}

#[tokio::test]
async fn expired_cache_is_refetched_and_overwritten() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(races_payload("Live GP")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    let old = Utc::now() - Duration::hours(2);
    state
        .fetcher
        .store()
        .write("races", &CacheEntry::new(races_payload("Cached GP"), old))
        .await
        .unwrap();

    let value = state
        .fetcher
        .fetch_with_cache(&state.config.api_url("current.json"), "races", Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(value, races_payload("Live GP"));

    let rewritten = state.fetcher.store().read("races").await.unwrap();
    assert_eq!(rewritten.data, races_payload("Live GP"));
    assert!(rewritten.timestamp > old);
}

#[tokio::test]
async fn expired_cache_is_served_when_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    let entry = CacheEntry::new(races_payload("Cached GP"), Utc::now() - Duration::days(3));
    state.fetcher.store().write("races", &entry).await.unwrap();

    let request = FetchRequest::new(
        state.config.api_url("current.json"),
        "races",
        Duration::hours(1),
    );
    let fetched = state.fetcher.fetch_json(&request).await.unwrap();

    assert_eq!(fetched.data, races_payload("Cached GP"));
    assert!(fetched.freshness.is_stale());
}

#[tokio::test]
async fn expired_cache_is_served_when_unreachable() {
    let dir = TempDir::new().expect("create tempdir");
    let state = state(UNREACHABLE, &dir);
    let entry = CacheEntry::new(races_payload("Cached GP"), Utc::now() - Duration::hours(5));
    state.fetcher.store().write("races", &entry).await.unwrap();

    let value = state
        .fetcher
        .fetch_with_cache(&state.config.api_url("current.json"), "races", Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(value, races_payload("Cached GP"));
}

#[tokio::test]
async fn no_cache_and_no_network_fails() {
    let dir = TempDir::new().expect("create tempdir");
    let state = state(UNREACHABLE, &dir);

    let err = state
        .fetcher
        .fetch_with_cache(&state.config.api_url("current.json"), "races", Duration::hours(1))
        .await
        .unwrap_err();
    assert_eq!(err.message(), "API request failed");
}

#[tokio::test]
async fn corrupt_cache_counts_as_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(races_payload("Live GP")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    std::fs::write(state.fetcher.store().entry_path("races"), "{not json").unwrap();

    let value = state
        .fetcher
        .fetch_with_cache(&state.config.api_url("current.json"), "races", Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(value, races_payload("Live GP"));
}

#[tokio::test]
async fn malformed_response_falls_back_to_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"MRData": {}})))
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    let request = FetchRequest::new(
        state.config.api_url("current.json"),
        "races",
        Duration::hours(1),
    )
    .validated_by(validate_races);

    // Without a cache the shape error itself surfaces.
    let err = state.fetcher.fetch_json(&request).await.unwrap_err();
    assert_eq!(err.message(), "Invalid data structure");

    let entry = CacheEntry::new(races_payload("Cached GP"), Utc::now() - Duration::hours(3));
    state.fetcher.store().write("races", &entry).await.unwrap();
    let fetched = state.fetcher.fetch_json(&request).await.unwrap();
    assert_eq!(fetched.data, races_payload("Cached GP"));
    assert!(fetched.freshness.is_stale());
}

#[tokio::test]
async fn images_are_cached_and_reused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/Monaco.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    let url = format!("{}/img/Monaco.png", server.uri());

    let first = state
        .fetcher
        .fetch_image(&url, "circuit_de_monaco", Some(Duration::days(90)))
        .await
        .expect("image downloaded");
    let second = state
        .fetcher
        .fetch_image(&url, "circuit_de_monaco", Some(Duration::days(90)))
        .await
        .expect("image reused");

    assert_eq!(first, second);
    assert_eq!(std::fs::read(first).unwrap(), vec![0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn missing_image_is_omitted() {
    let dir = TempDir::new().expect("create tempdir");
    let state = state(UNREACHABLE, &dir);
    let image = state
        .fetcher
        .fetch_image("http://127.0.0.1:9/img/x.png", "nowhere", None)
        .await;
    assert!(image.is_none());
}

#[tokio::test]
async fn failed_image_write_keeps_existing_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/img/Monza.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().expect("create tempdir");
    let state = state(&server.uri(), &dir);
    // A directory squatting on the image path makes the write fail but still has an age.
    let occupied = state.fetcher.store().image_path("monza");
    std::fs::create_dir_all(&occupied).unwrap();

    let image = state
        .fetcher
        .fetch_image(
            &format!("{}/img/Monza.png", server.uri()),
            "monza",
            Some(Duration::zero()),
        )
        .await;
    assert_eq!(image, Some(occupied));
}
