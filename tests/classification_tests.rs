//! Integration tests for error classification and response normalization.
//!
//! Each test drives a real response through the full pipeline of a
//! [`ResourceClient`] and checks the typed outcome.

use atomic_api::clients::ResponseKind;
use atomic_api::rest::{Payload, ResourceClient};
use atomic_api::{ApiError, ApiKey, AtomicClient, AtomicConfig, BaseUrl, ClientId, ErrorKind};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AtomicClient {
    let config = AtomicConfig::builder()
        .api_key(ApiKey::new("test-key").unwrap())
        .client_id(ClientId::new("agency").unwrap())
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    AtomicClient::new(&config).unwrap()
}

async fn fetch_value(client: &ResourceClient, route: &str) -> Result<Value, ApiError> {
    client.fetch(client.get(route)).await
}

// ============================================================================
// Status Classification
// ============================================================================

#[tokio::test]
async fn test_404_with_empty_body_is_not_found_with_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-site/999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.sites().get(999_u64, false).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.status_code(), Some(404));
    assert_eq!(error.response().unwrap().message, "HTTP 404 Not Found");
}

#[tokio::test]
async fn test_401_uses_error_field_as_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid api key"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = fetch_value(client.resource_client(), "/get-sites/agency")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::AuthenticationOrAuthorization);
    assert_eq!(error.response().unwrap().message, "invalid api key");
    assert!(error.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn test_403_is_authentication_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = fetch_value(client.resource_client(), "/x").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::AuthenticationOrAuthorization);
}

#[tokio::test]
async fn test_400_and_422_are_invalid_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "errors": [{"message": "domain_name is malformed"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/unprocessable"))
        .respond_with(ResponseTemplate::new(422).set_body_string("nope"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();

    let error = fetch_value(resource, "/bad").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    assert_eq!(error.response().unwrap().message, "domain_name is malformed");

    let error = fetch_value(resource, "/unprocessable").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidRequest);
    assert_eq!(error.response().unwrap().body, "nope");
}

#[tokio::test]
async fn test_429_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "7")
                .set_body_json(json!({"message": "slow down"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = fetch_value(client.resource_client(), "/get-sites/agency")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::RateLimited);
    match error {
        ApiError::RateLimited { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_500_with_html_body_keeps_raw_body_and_request_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(500)
                .insert_header("X-Request-Id", "req-abc")
                .set_body_string("<html><body>Internal error</body></html>"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = fetch_value(client.resource_client(), "/get-site/1")
        .await
        .unwrap_err();

    assert_eq!(error.kind(), ErrorKind::ServerError);
    assert_eq!(error.request_id(), Some("req-abc"));
    let details = error.response().unwrap();
    assert_eq!(details.message, "HTTP 500 Internal Server Error");
    assert_eq!(details.body, "<html><body>Internal error</body></html>");
}

#[tokio::test]
async fn test_unlisted_status_reads_body_signal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/conflict"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "site_not_found",
            "message": "No such site"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/teapot"))
        .respond_with(
            ResponseTemplate::new(418).set_body_json(json!({"message": "short and stout"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();

    let error = fetch_value(resource, "/conflict").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(error.status_code(), Some(409));

    let error = fetch_value(resource, "/teapot").await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GenericApiError);
    assert_eq!(error.response().unwrap().message, "short and stout");
}

#[tokio::test]
async fn test_success_status_proceeds_even_with_error_looking_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "not_found",
            "message": "looks bad but is 200"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = fetch_value(client.resource_client(), "/x").await.unwrap();
    assert_eq!(value["code"], "not_found");
}

// ============================================================================
// Normalization
// ============================================================================

#[tokio::test]
async fn test_envelope_is_unwrapped_for_single_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "OK",
            "data": {"atomic_site_id": 7, "domain_name": "example.com"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = fetch_value(client.resource_client(), "/get-site/7")
        .await
        .unwrap();
    assert_eq!(value, json!({"atomic_site_id": 7, "domain_name": "example.com"}));
}

#[tokio::test]
async fn test_object_with_extra_keys_is_not_an_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [1, 2],
            "scroll_id": "next"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let value = fetch_value(client.resource_client(), "/site-logs/x")
        .await
        .unwrap();
    assert_eq!(value["scroll_id"], "next");
    assert_eq!(value["data"], json!([1, 2]));
}

#[tokio::test]
async fn test_collections_keep_server_order_and_null_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ordered"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["c", "a", "b"]})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nothing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": null})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();

    let items: Vec<String> = resource.fetch_all(resource.get("/ordered")).await.unwrap();
    assert_eq!(items, vec!["c", "a", "b"]);

    let items: Vec<String> = resource.fetch_all(resource.get("/nothing")).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_collection_expected_but_object_returned_is_schema_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"site": 1})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();
    let error = resource
        .fetch_all::<Value>(resource.get("/get-sites/agency"))
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::SchemaValidation);
}

#[tokio::test]
async fn test_record_missing_required_field_names_type_and_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-site/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"atomic_site_id": 7})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client.sites().get(7_u64, false).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::SchemaValidation);
    match error {
        ApiError::SchemaValidation { type_name, message } => {
            assert_eq!(type_name, "Site");
            assert!(message.contains("domain_name"));
        }
        other => panic!("expected SchemaValidation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_success_body_is_null_value() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();
    let value: Value = resource.fetch(resource.post("/edge-cache/7/purge")).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_call_dispatches_on_declared_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resource = client.resource_client();
    let request = resource
        .get("/get-sites/agency")
        .expect(ResponseKind::Collection)
        .build()
        .unwrap();

    match resource.call::<Value>(&request).await.unwrap() {
        Payload::Records(records) => {
            assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
        }
        other => panic!("expected records, got {other:?}"),
    }
}
