//! Tests for the HTTP client module

use super::*;
use crate::auth::{AuthConfig, Authenticator, ORGANIZATION_HEADER};
use crate::cancel::StopSignal;
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(uri: String) -> HttpClientConfig {
    HttpClientConfig::builder()
        .base_url(uri)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .no_rate_limit()
        .build()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_some());
    assert!(config.user_agent.starts_with("assetq/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.initial_backoff, Duration::from_millis(200));
    assert_eq!(config.max_backoff, Duration::from_secs(30));
}

#[test]
fn test_build_url() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .base_url("https://api.example.com/")
            .build(),
    )
    .unwrap();
    assert_eq!(
        client.build_url("/v3/global/search/query"),
        "https://api.example.com/v3/global/search/query"
    );
    assert_eq!(client.build_url("https://other.example/x"), "https://other.example/x");
}

#[test]
fn test_calculate_backoff() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .backoff(
                BackoffType::Exponential,
                Duration::from_millis(100),
                Duration::from_millis(500),
            )
            .build(),
    )
    .unwrap();
    assert_eq!(client.calculate_backoff(0), Duration::from_millis(100));
    assert_eq!(client.calculate_backoff(1), Duration::from_millis(200));
    assert_eq!(client.calculate_backoff(2), Duration::from_millis(400));
    assert_eq!(client.calculate_backoff(3), Duration::from_millis(500));
    assert_eq!(client.calculate_backoff(40), Duration::from_millis(500));
}

#[test]
fn test_platform_error_message() {
    assert_eq!(
        client::platform_error_message(r#"{"error":{"code":403,"message":"forbidden org"}}"#),
        "forbidden org"
    );
    assert_eq!(
        client::platform_error_message(r#"{"detail":"bad query"}"#),
        "bad query"
    );
    assert_eq!(client::platform_error_message(" plain text \n"), "plain text");

    let long = "x".repeat(2000);
    let message = client::platform_error_message(&long);
    assert!(message.ends_with("..."));
    assert!(message.len() < 600);
}

#[tokio::test]
async fn test_http_client_post_records_meta() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/global/search/query"))
        .and(body_json(serde_json::json!({"query": "services.port: 22"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-request-id", "req-42")
                .set_body_json(serde_json::json!({"result": {"hits": []}})),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let response = client
        .post(
            "/v3/global/search/query",
            serde_json::json!({"query": "services.port: 22"}),
            &StopSignal::new(),
        )
        .await
        .unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.meta.request.method, "POST");
    assert!(response.meta.request.url.ends_with("/v3/global/search/query"));
    assert_eq!(response.meta.response.request_id.as_deref(), Some("req-42"));
    assert_eq!(response.meta.attempts, 1);

    let body: serde_json::Value = response.json().unwrap();
    assert!(body["result"]["hits"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_http_client_retries_cdn_origin_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/edge"))
        .respond_with(ResponseTemplate::new(522))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/edge"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let response = client.post("/api/edge", json!({}), &StopSignal::new()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.meta.attempts, 2);
}

#[tokio::test]
async fn test_http_client_client_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"detail": "bad query"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let err = client
        .post("/api/bad", json!({}), &StopSignal::new())
        .await
        .unwrap_err();

    assert!(!err.is_retryable());
    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
}

#[tokio::test]
async fn test_http_client_applies_auth() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/secure"))
        .and(header("Authorization", "Bearer pat-1"))
        .and(header(ORGANIZATION_HEADER, "org-9"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let auth = Authenticator::new(AuthConfig::bearer("pat-1"))
        .with_organization(Some("org-9".to_string()));
    let client = HttpClient::with_auth(test_config(mock_server.uri()), auth).unwrap();
    let response = client.post("/api/secure", json!({}), &StopSignal::new()).await.unwrap();

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_http_client_404_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"error": {"message": "asset not found"}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let err = client
        .post("/api/missing", json!({}), &StopSignal::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "asset not found");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_client_retry_on_500_counts_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let response = client.post("/api/flaky", json!({}), &StopSignal::new()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.meta.attempts, 3);
}

#[tokio::test]
async fn test_http_client_rate_limit_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("Rate limited"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/limited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let response = client.post("/api/limited", json!({}), &StopSignal::new()).await.unwrap();

    assert_eq!(response.status, 200);
    assert_eq!(response.meta.attempts, 2);
}

#[tokio::test]
async fn test_http_client_max_retries_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/always-fail"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Server error"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig {
        max_retries: 2,
        ..test_config(mock_server.uri())
    };
    let client = HttpClient::with_config(config).unwrap();
    let err = client
        .post("/api/always-fail", json!({}), &StopSignal::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));
}

#[tokio::test]
async fn test_http_client_stopped_before_send() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let stop = StopSignal::new();
    stop.cancel();

    let err = client.post("/api/anything", json!({}), &stop).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[tokio::test]
async fn test_http_client_deadline_interrupts_slow_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(test_config(mock_server.uri())).unwrap();
    let stop = StopSignal::with_timeout(Duration::from_millis(50));

    let err = client.post("/api/slow", json!({}), &stop).await.unwrap_err();
    assert!(matches!(err, Error::DeadlineExceeded { .. }));
}
