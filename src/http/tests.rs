//! Tests for the authenticated HTTP client

use super::*;
use crate::error::Error;
use crate::store::{Credential, CredentialStore, MemoryStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> AuthClient {
    AuthClient::new(
        ClientConfig::new(server.uri()),
        Arc::new(MemoryStore::new()),
    )
}

fn client_with_credential(server: &MockServer, access: &str, refresh: &str) -> AuthClient {
    AuthClient::new(
        ClientConfig::new(server.uri()),
        Arc::new(MemoryStore::with_credential(Credential::new(
            access, refresh,
        ))),
    )
}

#[test]
fn test_client_config_defaults() {
    let config = ClientConfig::new("https://api.example.com");
    assert_eq!(config.base_url, "https://api.example.com");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.refresh_path, DEFAULT_REFRESH_PATH);
    assert_eq!(config.auth_failure_statuses, vec![401, 403]);
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_client_config_builder() {
    let config = ClientConfig::builder("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .refresh_path("/v2/auth/refresh")
        .auth_failure_statuses(vec![403])
        .header("X-Tenant", "acme")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.refresh_path, "/v2/auth/refresh");
    assert_eq!(config.auth_failure_statuses, vec![403]);
    assert_eq!(
        config.default_headers.get("X-Tenant"),
        Some(&"acme".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .query("page", "1")
        .header("X-Request-Id", "abc123")
        .json(serde_json::json!({"key": "value"}))
        .timeout(Duration::from_secs(10));

    assert_eq!(config.query.get("page"), Some(&"1".to_string()));
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert!(config.body.is_some());
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[tokio::test]
async fn test_attaches_bearer_from_store() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let response = client.get("/applications").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_sends_unauthenticated_when_store_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/public/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/public/status").await.unwrap();

    assert_eq!(response.status(), 200);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_success_passes_body_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 42, "status": "IN_REVIEW"
        })))
        .mount(&mock_server)
        .await;

    // Refresh endpoint must never be touched on a plain success
    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let body: serde_json::Value = client.get_json("/applications/42").await.unwrap();

    assert_eq!(body["id"], 42);
    assert_eq!(body["status"], "IN_REVIEW");
}

#[tokio::test]
async fn test_non_auth_error_passes_through_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let err = client.get("/applications").await.unwrap_err();

    match err {
        Error::Upstream { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_and_retry_on_stale_token() {
    let mock_server = MockServer::start().await;

    // Stale token is rejected
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Refresh exchange succeeds with a new pair
    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .and(body_json(serde_json::json!({"refreshToken": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "A2", "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Retry with the renewed token succeeds
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "open": 7
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let body: serde_json::Value = client.get_json("/admin/stats").await.unwrap();

    assert_eq!(body["open"], 7);
    assert_eq!(client.store().get(), Some(Credential::new("A2", "R2")));
}

#[tokio::test]
async fn test_retry_happens_at_most_once() {
    let mock_server = MockServer::start().await;

    // Rejects both the original send and the single retry; a third send
    // would trip the expect(2) bound
    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "A2", "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let err = client.get("/admin/stats").await.unwrap_err();

    // The second failure surfaces as-is
    match err {
        Error::Upstream { status, body } => {
            assert_eq!(status, 403);
            assert_eq!(body, "forbidden");
        }
        other => panic!("expected Upstream, got {other:?}"),
    }

    // The renewed pair from the successful refresh is kept
    assert_eq!(client.store().get(), Some(Credential::new("A2", "R2")));
}

#[tokio::test]
async fn test_no_refresh_without_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/admin/stats").await.unwrap_err();

    assert!(matches!(err, Error::SessionExpired));
}

#[tokio::test]
async fn test_refresh_failure_invalidates_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid refresh token"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");

    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = Arc::clone(&fired);
        client.session().on_invalidated(move || {
            fired.fetch_add(1, Ordering::SeqCst);
        });
    }

    let err = client.get("/admin/stats").await.unwrap_err();

    assert!(matches!(err, Error::RefreshFailed { .. }));
    assert!(client.store().get().is_none());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_refresh_body_invalidates_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/stats"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let err = client.get("/admin/stats").await.unwrap_err();

    assert!(matches!(err, Error::RefreshFailed { .. }));
    assert!(client.store().get().is_none());
}

#[test_case(401; "unauthorized triggers refresh")]
#[test_case(403; "forbidden triggers refresh")]
#[tokio::test]
async fn test_auth_failure_statuses_trigger_refresh(status: u16) {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "A2", "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_with_credential(&mock_server, "A1", "R1");
    let response = client.get("/cases").await.unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_custom_auth_failure_statuses() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .respond_with(ResponseTemplate::new(401).set_body_string("nope"))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(DEFAULT_REFRESH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    // Configured to refresh only on 403, so a 401 is an upstream error
    let config = ClientConfig::builder(mock_server.uri())
        .auth_failure_statuses(vec![403])
        .build();
    let client = AuthClient::new(
        config,
        Arc::new(MemoryStore::with_credential(Credential::new("A1", "R1"))),
    );

    let err = client.get("/cases").await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_custom_refresh_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "accessToken": "A2", "refreshToken": "R2"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder(mock_server.uri())
        .refresh_path("/v2/auth/refresh")
        .build();
    let client = AuthClient::new(
        config,
        Arc::new(MemoryStore::with_credential(Credential::new("A1", "R1"))),
    );

    let response = client.get("/cases").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_query_params_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/applications"))
        .and(query_param("page", "2"))
        .and(header("X-Request-Id", "req-456"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get_with_config(
            "/applications",
            RequestConfig::new()
                .query("page", "2")
                .header("X-Request-Id", "req-456"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_default_headers_applied() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases"))
        .and(header("X-Tenant", "acme"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder(mock_server.uri())
        .header("X-Tenant", "acme")
        .build();
    let client = AuthClient::new(config, Arc::new(MemoryStore::new()));

    let response = client.get("/cases").await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_full_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = AuthClient::new(
        ClientConfig::new("https://api.example.com"),
        Arc::new(MemoryStore::new()),
    );

    let response = client
        .get(&format!("{}/elsewhere", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/applications"))
        .and(body_json(serde_json::json!({"firstName": "Ada"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .post("/applications", serde_json::json!({"firstName": "Ada"}))
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
}

#[test]
fn test_client_debug() {
    let client = AuthClient::new(
        ClientConfig::new("https://api.example.com"),
        Arc::new(MemoryStore::new()),
    );
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("AuthClient"));
    assert!(debug_str.contains("has_credential"));
}
