//! Tests for the platform API module

use super::*;
use crate::assets::AssetType;
use crate::cancel::StopSignal;
use crate::error::{Error, ErrorKind};
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::PageFetcher;
use crate::types::BackoffType;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(uri: String) -> PlatformClient {
    let config = HttpClientConfig::builder()
        .base_url(uri)
        .max_retries(0)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_millis(10),
        )
        .no_rate_limit()
        .build();
    PlatformClient::new(HttpClient::with_config(config).unwrap())
}

fn host_hit(ip: &str) -> serde_json::Value {
    json!({"host_v1": {"resource": {"ip": ip}}})
}

#[test]
fn test_paths() {
    assert_eq!(PlatformClient::search_path(None), "/v3/global/search/query");
    assert_eq!(
        PlatformClient::search_path(Some("c-1")),
        "/v3/collections/c-1/search/query"
    );

    let request = LookupRequest {
        asset_type: AssetType::WebProperty,
        asset_ids: vec!["example.com:443".to_string()],
        at_time: None,
    };
    assert_eq!(
        PlatformClient::lookup_path(&request),
        "/v3/global/asset/webproperty"
    );
}

#[test]
fn test_lookup_body_keys() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let request = LookupRequest {
        asset_type: AssetType::Certificate,
        asset_ids: vec!["ab12".to_string()],
        at_time: Some(at),
    };
    assert_eq!(
        request.to_body(),
        json!({"certificate_ids": ["ab12"], "at_time": "2024-01-02T03:04:05+00:00"})
    );
}

#[test]
fn test_search_request_skips_unset_fields() {
    let request = SearchRequest {
        query: "services.port: 22".to_string(),
        ..Default::default()
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({"query": "services.port: 22"})
    );
}

#[tokio::test]
async fn test_search_fetcher_sends_cursor_and_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/global/search/query"))
        .and(body_json(json!({"query": "host.ip: *", "page_size": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "hits": [host_hit("192.0.2.1"), host_hit("192.0.2.2")],
                "total_hits": 3,
                "next_page_token": "tok-2"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v3/global/search/query"))
        .and(body_json(
            json!({"query": "host.ip: *", "page_size": 2, "page_token": "tok-2"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"hits": [host_hit("192.0.2.3")], "total_hits": 3}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(server.uri());
    let stop = StopSignal::new();
    let mut fetcher = SearchFetcher::new(&client, "host.ip: *");

    let first = fetcher.fetch_page(&stop, None, Some(2)).await.unwrap();
    let body = first.body.unwrap();
    assert_eq!(body.hits.len(), 2);
    assert_eq!(body.total, 3);
    assert_eq!(body.next_cursor.as_deref(), Some("tok-2"));
    let meta = first.meta.unwrap();
    assert_eq!(meta.request.method, "POST");
    assert_eq!(meta.response.status, 200);

    let second = fetcher.fetch_page(&stop, Some("tok-2"), Some(2)).await.unwrap();
    let body = second.body.unwrap();
    assert_eq!(body.hits, vec![host_hit("192.0.2.3")]);
    assert_eq!(body.next_cursor, None);
}

#[tokio::test]
async fn test_search_fetcher_collection_and_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v3/collections/c-9/search/query"))
        .and(body_json(json!({"query": "q", "fields": ["host.ip"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": {"hits": [], "total_hits": 0}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = SearchFetcher::new(&client, "q")
        .fields(vec!["host.ip".to_string()])
        .collection(Some("c-9".to_string()));

    let page = fetcher
        .fetch_page(&StopSignal::new(), None, None)
        .await
        .unwrap();
    assert_eq!(page.body.unwrap().total, 0);
}

#[tokio::test]
async fn test_search_without_result_has_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = SearchFetcher::new(&client, "q");
    let page = fetcher
        .fetch_page(&StopSignal::new(), None, None)
        .await
        .unwrap();

    assert!(page.body.is_none());
    assert!(page.meta.is_some());
}

#[tokio::test]
async fn test_search_null_result_has_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = SearchFetcher::new(&client, "q");
    let page = fetcher
        .fetch_page(&StopSignal::new(), None, None)
        .await
        .unwrap();

    assert!(page.body.is_none());
}

#[tokio::test]
async fn test_lookup_null_result_has_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = LookupFetcher::new(&client, AssetType::Host, vec!["192.0.2.1".to_string()]);
    let page = fetcher
        .fetch_page(&StopSignal::new(), None, None)
        .await
        .unwrap();

    assert!(page.body.is_none());
    assert!(page.meta.is_some());
}

#[tokio::test]
async fn test_search_error_status_is_remote() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "invalid query syntax"}
        })))
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = SearchFetcher::new(&client, "((");
    let err = fetcher
        .fetch_page(&StopSignal::new(), None, None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert!(err.to_string().contains("invalid query syntax"));
}

#[tokio::test]
async fn test_lookup_fetcher_batches_ids() {
    let server = MockServer::start().await;
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    Mock::given(method("POST"))
        .and(path("/v3/global/asset/host"))
        .and(body_json(json!({
            "host_ids": ["192.0.2.1", "192.0.2.2"],
            "at_time": "2024-06-01T00:00:00+00:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [host_hit("192.0.2.1"), host_hit("192.0.2.2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v3/global/asset/host"))
        .and(body_json(json!({
            "host_ids": ["192.0.2.3"],
            "at_time": "2024-06-01T00:00:00+00:00"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [host_hit("192.0.2.3")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(server.uri());
    let stop = StopSignal::new();
    let ids = vec![
        "192.0.2.1".to_string(),
        "192.0.2.2".to_string(),
        "192.0.2.3".to_string(),
    ];
    let mut fetcher = LookupFetcher::new(&client, AssetType::Host, ids).at_time(Some(at));

    let first = fetcher.fetch_page(&stop, None, Some(2)).await.unwrap();
    let body = first.body.unwrap();
    assert_eq!(body.hits.len(), 2);
    assert_eq!(body.total, 3);
    assert_eq!(body.next_cursor.as_deref(), Some("2"));

    let second = fetcher.fetch_page(&stop, Some("2"), Some(2)).await.unwrap();
    let body = second.body.unwrap();
    assert_eq!(body.hits.len(), 1);
    assert_eq!(body.next_cursor, None);
}

#[tokio::test]
async fn test_lookup_cursor_past_end_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(server.uri());
    let mut fetcher = LookupFetcher::new(&client, AssetType::Host, vec!["192.0.2.1".to_string()]);
    let page = fetcher
        .fetch_page(&StopSignal::new(), Some("5"), None)
        .await
        .unwrap();

    let body = page.body.unwrap();
    assert!(body.hits.is_empty());
    assert_eq!(body.total, 1);
    assert!(page.meta.is_none());
}

#[tokio::test]
async fn test_lookup_invalid_cursor() {
    let client = client("http://127.0.0.1:9".to_string());
    let mut fetcher = LookupFetcher::new(&client, AssetType::Host, vec!["192.0.2.1".to_string()]);

    let err = fetcher
        .fetch_page(&StopSignal::new(), Some("tok-abc"), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("tok-abc"));
}

#[test]
fn test_default_lookup_batch() {
    assert_eq!(DEFAULT_LOOKUP_BATCH, 100);
    assert!(DEFAULT_BASE_URL.starts_with("https://"));
}
