//! HTTP client tests against a mock backend

use std::time::Duration;

use backend_api::models::{RealLogKind, StopServiceRequest};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use honeydash::errors::DashboardError;
use honeydash::http::client::HttpClient;
use honeydash::http::logs::StructuredLogQuery;

fn client(server: &MockServer) -> HttpClient {
    HttpClient::new(&format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
}

#[test]
fn test_invalid_base_url() {
    let result = HttpClient::new("not a url", Duration::from_secs(1));
    assert!(matches!(result, Err(DashboardError::ConfigError(_))));
}

#[test]
fn test_trailing_slash_trimmed() {
    let client = HttpClient::new("http://localhost:5000/", Duration::from_secs(1)).unwrap();
    assert_eq!(client.base_url(), "http://localhost:5000");
}

#[tokio::test]
async fn test_list_services_bare_and_wrapped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "ssh", "container_id": "abc", "config": {"port": 2222}}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{"name": "api", "type": "process", "process_id": 77}]
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    let bare = assert_ok!(client.list_services().await);
    assert_eq!(bare[0].container_id.as_deref(), Some("abc"));
    assert_eq!(bare[0].port(), Some(2222));

    let wrapped = assert_ok!(client.list_services().await);
    assert_eq!(wrapped[0].process_id.as_deref(), Some("77"));
}

#[tokio::test]
async fn test_start_wraps_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/start"))
        .and(body_json(json!({"config": {"name": "redis", "port": 6379}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .start_service(&json!({"name": "redis", "port": 6379}))
        .await
        .unwrap();
    assert_eq!(response["status"], "ok");
}

#[tokio::test]
async fn test_stop_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/stop"))
        .and(body_json(json!({"type": "docker", "container_id": "abc"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .stop_service(&StopServiceRequest::container("abc"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_error_message_extraction() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/services/start"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Bind for 0.0.0.0:2222 failed: port is already allocated"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/services/stop"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
        .mount(&server)
        .await;

    let client = client(&server);
    match client.start_service(&json!({})).await {
        Err(DashboardError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Bind for 0.0.0.0:2222 failed: port is already allocated");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    let err = assert_err!(client.stop_service(&StopServiceRequest::process("1")).await);
    assert_eq!(err.to_string(), "HTTP error! status: 502");
}

#[tokio::test]
async fn test_timeout_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
    let err = assert_err!(client.list_services().await);
    assert!(err.is_timeout(), "got {:?}", err);
}

#[tokio::test]
async fn test_log_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/abc/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": "hello"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/abc/reallogs"))
        .and(query_param("type", "commands"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": "ls -la"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/services/abc/structured_logs"))
        .and(query_param("type", "auth"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [{"type": "FAILED_LOGIN", "ip": "1.2.3.4", "user": "root"}],
            "statistics": {"failed_logins": 1}
        })))
        .mount(&server)
        .await;

    let client = client(&server);
    assert_eq!(client.container_logs("abc").await.unwrap().logs.as_deref(), Some("hello"));
    assert_eq!(
        client.real_logs("abc", RealLogKind::Commands).await.unwrap().logs.as_deref(),
        Some("ls -la")
    );

    let query = StructuredLogQuery {
        kind: RealLogKind::Auth,
        limit: 50,
    };
    let structured = client.structured_logs("abc", &query).await.unwrap();
    assert_eq!(structured.logs[0].event_type.as_deref(), Some("FAILED_LOGIN"));
    assert_eq!(structured.statistics["failed_logins"], json!(1));
}

#[tokio::test]
async fn test_ids_are_encoded_as_one_segment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/services/sshd%2F2%3Fx/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logs": "encoded"})))
        .mount(&server)
        .await;

    let logs = assert_ok!(client(&server).container_logs("sshd/2?x").await);
    assert_eq!(logs.logs.as_deref(), Some("encoded"));
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/api/", server.uri()), Duration::from_secs(5)).unwrap();
    assert!(assert_ok!(client.list_services().await).is_empty());
}
