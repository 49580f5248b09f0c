#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hexdash_api::{ApiClient, ControlAction, Error, ProcessStatus, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base_url, &TransportConfig::default()).unwrap();
    (server, client)
}

/// A client pointed at a port nothing listens on.
fn unreachable_client() -> ApiClient {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let base_url = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let transport = TransportConfig::default().with_timeout(Duration::from_secs(2));
    ApiClient::new(base_url, &transport).unwrap()
}

fn sample_snapshot() -> serde_json::Value {
    json!({
        "system_load": {
            "cpu_percent": 45,
            "memory_percent": 60,
            "active_connections": 12
        },
        "total_processes": 3,
        "processes": [{
            "pid": 101,
            "status": "running",
            "runtime": "72.5s",
            "progress_percent": "50%",
            "bytes_processed": 2048,
            "command": "nmap -sV target"
        }]
    })
}

// ── Health ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_health_ok() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "healthy" })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.check_health().await);
}

#[tokio::test]
async fn test_check_health_server_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    assert!(!client.check_health().await);
    let err = client.health().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_check_health_unreachable() {
    let client = unreachable_client();
    assert!(!client.check_health().await);
    assert!(matches!(client.health().await, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_check_health_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let transport = TransportConfig::default().with_timeout(Duration::from_millis(100));
    let client = ApiClient::new(Url::parse(&server.uri()).unwrap(), &transport).unwrap();

    assert!(!client.check_health().await);
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_snapshot() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_snapshot()))
        .mount(&server)
        .await;

    let snapshot = client.fetch_snapshot().await.unwrap();

    assert_eq!(snapshot.total_processes, 3);
    assert_eq!(snapshot.system_load.active_connections, 12);
    assert_eq!(snapshot.processes.len(), 1);
    assert_eq!(snapshot.processes[0].pid, Some(101));
    assert_eq!(snapshot.processes[0].status, ProcessStatus::Running);
}

#[tokio::test]
async fn test_fetch_snapshot_non_success_is_absent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/live"))
        .respond_with(ResponseTemplate::new(500).set_body_json(sample_snapshot()))
        .mount(&server)
        .await;

    assert!(client.fetch_snapshot().await.is_none());
}

#[tokio::test]
async fn test_fetch_snapshot_keeps_good_rows_beside_odd_ones() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "system_load": { "cpu_percent": 30.0, "active_connections": 4.0 },
            "total_processes": 4.0,
            "processes": [
                { "pid": 101, "status": "running", "bytes_processed": 2048.0 },
                { "pid": 102, "status": null, "command": null },
                { "status": "running", "command": "whoami" },
                ["not", "a", "record"]
            ]
        })))
        .mount(&server)
        .await;

    let snapshot = client.fetch_snapshot().await.unwrap();

    assert_eq!(snapshot.total_processes, 4);
    assert_eq!(snapshot.system_load.active_connections, 4);
    let pids: Vec<Option<u32>> = snapshot.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![Some(101), Some(102), None]);
    assert_eq!(snapshot.processes[0].bytes_processed, 2048);
    assert_eq!(snapshot.processes[1].status, ProcessStatus::default());
    assert_eq!(snapshot.processes[1].command, "");
}

#[tokio::test]
async fn test_fetch_snapshot_malformed_body_is_absent() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/live"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    assert!(client.fetch_snapshot().await.is_none());
    let err = client.dashboard().await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_snapshot_unreachable_is_absent() {
    let client = unreachable_client();
    assert!(client.fetch_snapshot().await.is_none());
}

#[tokio::test]
async fn test_fetch_snapshot_respects_base_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hexstrike/api/dashboard/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "processes": [] })))
        .mount(&server)
        .await;

    let base = Url::parse(&format!("{}/hexstrike/", server.uri())).unwrap();
    let client = ApiClient::new(base, &TransportConfig::default()).unwrap();

    let snapshot = client.fetch_snapshot().await.unwrap();
    assert!(snapshot.processes.is_empty());
}

// ── Process status ──────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_process_status() {
    let (server, client) = setup().await;

    let body = json!({
        "pid": 42,
        "status": "running",
        "details": { "target": "10.0.0.1", "phase": 2 }
    });

    Mock::given(method("GET"))
        .and(path("/api/processes/status/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let status = client.fetch_process_status(42).await.unwrap();
    assert_eq!(status, body);
}

#[tokio::test]
async fn test_fetch_process_status_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/processes/status/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "no such pid" })))
        .mount(&server)
        .await;

    assert!(client.fetch_process_status(404).await.is_none());
}

// ── Control ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_terminate_pause_resume() {
    let (server, client) = setup().await;

    for action in ["terminate", "pause", "resume"] {
        Mock::given(method("POST"))
            .and(path(format!("/api/processes/{action}/42")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
    }

    assert!(client.terminate_process(42).await);
    assert!(client.pause_process(42).await);
    assert!(client.resume_process(42).await);
}

#[tokio::test]
async fn test_control_ignores_body_and_uses_status() {
    let (server, client) = setup().await;

    // A success status with a garbage body still counts as success.
    Mock::given(method("POST"))
        .and(path("/api/processes/pause/7"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    // A failure status with a cheerful body still counts as failure.
    Mock::given(method("POST"))
        .and(path("/api/processes/resume/7"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    assert!(client.pause_process(7).await);
    assert!(!client.resume_process(7).await);

    let err = client.control(ControlAction::Resume, 7).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_control_unreachable_is_false() {
    let client = unreachable_client();
    assert!(!client.terminate_process(1).await);
    assert!(!client.pause_process(1).await);
    assert!(!client.resume_process(1).await);
}
