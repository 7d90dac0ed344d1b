//! Integration tests using wiremock to simulate HTTP servers.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use wicket::{Error, Gateway, HeaderMode, Params, RequestSpec};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct TestUser {
    id: u32,
    name: String,
}

fn gateway_for(server: &MockServer) -> Gateway {
    Gateway::builder().base_url(server.uri()).build()
}

fn params(entries: &[(&str, serde_json::Value)]) -> Params {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[tokio::test]
async fn get_without_params_builds_url_without_query_marker() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway
        .request_document(RequestSpec::get("/users"))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn get_params_appear_as_query_pairs() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param("active", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway
        .request_document(
            RequestSpec::get("/users")
                .with_param("page", json!(1))
                .with_param("active", json!(true)),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn sanitized_get_drops_empty_strings_keeps_falsy_values() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "0"))
        .and(query_param_is_missing("filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway
        .request_document(
            RequestSpec::get("/search")
                .with_param("page", json!(0))
                .with_param("filter", json!(""))
                .sanitized(),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn default_headers_are_sent_and_per_call_overrides_win() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/whoami"))
        .and(header("Content-Type", "application/json"))
        .and(header("X-Team", "override"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway.set_global_header("X-Team", "default");

    gateway
        .request_document(RequestSpec::get("/whoami").with_header("X-Team", "override"))
        .await
        .unwrap();
}

#[tokio::test]
async fn header_set_to_empty_string_is_not_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quiet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway.set_global_header("X-Trace", "");
    assert!(!gateway.default_headers().contains_key("X-Trace"));

    gateway
        .request_document(RequestSpec::get("/quiet"))
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-Trace").is_none());
}

#[tokio::test]
async fn post_params_become_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "Alice", "age": 30})))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"id": 1, "name": "Alice"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let created: TestUser = gateway
        .post(
            "/users",
            params(&[("name", json!("Alice")), ("age", json!(30))]),
        )
        .await
        .unwrap();

    assert_eq!(created, TestUser { id: 1, name: "Alice".to_string() });
}

#[tokio::test]
async fn arbitrary_method_dispatch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/users/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let body: serde_json::Value = gateway
        .request(Method::DELETE, "/users/1", Params::new())
        .await
        .unwrap();

    assert_eq!(body, json!({"deleted": true}));
}

#[tokio::test]
async fn raw_shape_passes_bytes_through_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blob"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not json at all".to_vec()))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let bytes = gateway.request_raw(RequestSpec::get("/blob")).await.unwrap();

    assert_eq!(bytes, b"not json at all");
}

#[tokio::test]
async fn document_shape_rejects_top_level_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result = gateway.request_document(RequestSpec::get("/list")).await;

    match result {
        Err(Error::InvalidResponse { raw_response }) => {
            assert_eq!(raw_response, "[1,2,3]");
        }
        other => panic!("Expected InvalidResponse, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn typed_decode_failure_preserves_raw_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("invalid json"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    let result: Result<TestUser, _> = gateway.request_typed(RequestSpec::get("/user")).await;

    match result {
        Err(Error::Decode { raw_response, serde_error }) => {
            assert_eq!(raw_response, "invalid json");
            assert!(serde_error.contains("expected"));
        }
        other => panic!("Expected Decode, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn transport_failure_surfaces_for_every_shape() {
    // Claim a port, then shut the server down so every connection attempt
    // is refused.
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let gateway = Gateway::builder().base_url(uri).build();

    let raw = gateway.request_raw(RequestSpec::get("/a")).await;
    let document = gateway.request_document(RequestSpec::get("/b")).await;
    let typed: Result<TestUser, _> = gateway.request_typed(RequestSpec::get("/c")).await;

    assert!(matches!(raw, Err(Error::Engine(_))));
    assert!(matches!(document, Err(Error::Engine(_))));
    assert!(matches!(typed, Err(Error::Engine(_))));
}

#[tokio::test]
async fn multipart_upload_carries_fields_and_file() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"stored": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let attachment = std::env::temp_dir().join("wicket_test_attachment.txt");
    std::fs::write(&attachment, b"file contents").unwrap();

    let gateway = gateway_for(&mock_server);
    let document = gateway
        .request_document(
            RequestSpec::post("/upload")
                .with_param("caption", json!("holiday"))
                .with_file("photo", &attachment),
        )
        .await
        .unwrap();

    assert_eq!(document.get("stored"), Some(&json!(true)));

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("holiday"));
    assert!(body.contains("file contents"));

    std::fs::remove_file(&attachment).ok();
}

#[tokio::test]
async fn binary_upload_with_custom_headers_only() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/media"))
        .and(header("Content-Type", "image/png"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"uploaded": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server);
    gateway.set_global_header("X-Default", "should-not-appear");

    let custom = HashMap::from([("Content-Type".to_string(), "image/png".to_string())]);
    let document = gateway
        .upload_document(
            &format!("{}/media", mock_server.uri()),
            Method::PUT,
            vec![0x89, 0x50, 0x4e, 0x47],
            &custom,
            HeaderMode::ReplaceDefaults,
        )
        .await
        .unwrap();

    assert_eq!(document.get("uploaded"), Some(&json!(true)));

    let requests = mock_server.received_requests().await.unwrap();
    let request = &requests[0];
    assert_eq!(request.body, vec![0x89, 0x50, 0x4e, 0x47]);
    assert!(request.headers.get("X-Default").is_none());
}

#[tokio::test]
async fn initialise_reconfigures_a_running_gateway() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = Gateway::new();
    gateway.initialise(
        mock_server.uri(),
        Some(HashMap::from([(
            "X-Api-Key".to_string(),
            "secret".to_string(),
        )])),
    );

    gateway
        .request_document(RequestSpec::get("/users"))
        .await
        .unwrap();

    // The wholesale replacement dropped the stock Content-Type default.
    assert!(!gateway.default_headers().contains_key("Content-Type"));
}
