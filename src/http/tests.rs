//! Tests for the HTTP module

use super::*;
use crate::error::{Error, FailureCause};
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(page: u32, titles: &[&str]) -> serde_json::Value {
    let results: Vec<_> = titles
        .iter()
        .map(|t| json!({"title": t, "release_date": "2001-01-01", "poster_path": "/p.jpg"}))
        .collect();
    json!({"page": page, "results": results, "total_pages": 500})
}

fn client_for(server: &MockServer) -> MovieApiClient {
    let config = ApiClientConfig::builder()
        .base_url(server.uri())
        .api_key("test-key")
        .no_rate_limit()
        .build();
    MovieApiClient::new(config).unwrap()
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_api_client_config_default() {
    let config = ApiClientConfig::default();
    assert_eq!(config.base_url, "https://api.themoviedb.org/3");
    assert_eq!(config.language, "en_US");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 0);
    assert!(config.api_key.is_none());
    assert!(config.rate_limit.is_some());
}

#[test]
fn test_api_client_config_builder() {
    let config = ApiClientConfig::builder()
        .base_url("https://api.example.com")
        .api_key("k")
        .language("uk_UA")
        .timeout(Duration::from_secs(5))
        .max_retries(2)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(3),
        )
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.api_key.as_deref(), Some("k"));
    assert_eq!(config.language, "uk_UA");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_calculate_backoff() {
    let config = ApiClientConfig::builder()
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .no_rate_limit()
        .build();
    let client = MovieApiClient::new(config).unwrap();

    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert!(!client.has_rate_limiter());
}

#[test]
fn test_client_debug_hides_key() {
    let config = ApiClientConfig::builder().api_key("secret").build();
    let client = MovieApiClient::new(config).unwrap();
    let debug = format!("{client:?}");
    assert!(debug.contains("has_api_key: true"));
    assert!(!debug.contains("secret"));
}

// ============================================================================
// Requests
// ============================================================================

#[tokio::test]
async fn test_top_rated_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("language", "en_US"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(3, &["A", "B"])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let page = client.top_rated(3).await.unwrap();

    assert_eq!(page.page, 3);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[1].title, "B");
}

#[tokio::test]
async fn test_fetch_returns_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, &["Heat"])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let movies = client.fetch(1).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Heat");
}

#[tokio::test]
async fn test_fetch_status_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let cause = client.fetch(1).await.unwrap_err();
    assert_eq!(
        cause,
        FailureCause::Status {
            status: 401,
            body: "Invalid API key".to_string()
        }
    );
}

#[tokio::test]
async fn test_fetch_timeout_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(1, &["Slow"]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = ApiClientConfig::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(50))
        .no_rate_limit()
        .build();
    let client = MovieApiClient::new(config).unwrap();

    let err = client.top_rated(1).await.unwrap_err();
    assert!(matches!(err, Error::Timeout { timeout_ms: 50 }));
    assert_eq!(client.fetch(1).await.unwrap_err(), FailureCause::Timeout);
}

#[tokio::test]
async fn test_fetch_decode_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.fetch(1).await.unwrap_err(),
        FailureCause::Decode(_)
    ));
}

#[tokio::test]
async fn test_fetch_connect_failure() {
    let config = ApiClientConfig::builder()
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(2))
        .no_rate_limit()
        .build();
    let client = MovieApiClient::new(config).unwrap();

    assert!(client.fetch(1).await.unwrap_err().is_connect());
}

#[tokio::test]
async fn test_transport_retry_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(1, &["Ok"])))
        .mount(&server)
        .await;

    let config = ApiClientConfig::builder()
        .base_url(server.uri())
        .max_retries(1)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(10),
        )
        .no_rate_limit()
        .build();
    let client = MovieApiClient::new(config).unwrap();

    let movies = client.fetch(1).await.unwrap();
    assert_eq!(movies[0].title, "Ok");
}

#[tokio::test]
async fn test_no_transport_retry_by_default() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/movie/top_rated"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.fetch(1).await.unwrap_err(),
        FailureCause::Status { status: 503, .. }
    ));
}

// ============================================================================
// Connectivity
// ============================================================================

#[tokio::test]
async fn test_always_online() {
    assert!(AlwaysOnline.is_connected().await);
}

#[tokio::test]
async fn test_tcp_probe_reachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let probe = TcpProbe::new(addr.to_string(), Duration::from_secs(1));
    assert!(probe.is_connected().await);
}

#[tokio::test]
async fn test_tcp_probe_unreachable() {
    let probe = TcpProbe::new("127.0.0.1:1", Duration::from_millis(500));
    assert_eq!(probe.addr(), "127.0.0.1:1");
    assert!(!probe.is_connected().await);
}
