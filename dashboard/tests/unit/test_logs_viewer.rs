//! Logs viewer tests

use std::sync::Arc;

use backend_api::models::{LogEntry, LogsResponse, RealLogKind, StructuredLogsResponse};
use chrono::{TimeZone, Utc};
use serde_json::json;

use honeydash::dashboard::view::DashboardView;
use honeydash::models::honeypot::RunningHoneypot;
use honeydash::models::notification::NotificationKind;
use honeydash::notify::center::NotificationCenter;
use honeydash::utils::today;
use honeydash::viewer::logs::{LogSource, LogsViewer};

use crate::fake_api::FakeApi;

async fn ssh_honeypot(api: &Arc<FakeApi>) -> RunningHoneypot {
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();
    view.snapshot().await.honeypots.remove(0)
}

fn ssh_api() -> FakeApi {
    FakeApi::new().with_services(json!([
        {"name": "ssh", "container_id": "c-ssh", "config": {"port": 2222}}
    ]))
}

fn entry(level: &str, threat: &str, event: &str) -> LogEntry {
    LogEntry {
        level: Some(level.to_string()),
        threat_level: Some(threat.to_string()),
        event_type: Some(event.to_string()),
        ip: Some("10.0.0.9".to_string()),
        user: Some("root".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_container_logs_shown() {
    let api = Arc::new(ssh_api().with_container_logs(LogsResponse {
        logs: Some("login root\nlogin admin".to_string()),
        ..Default::default()
    }));
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.select(ssh_honeypot(&api).await).await;

    let state = viewer.snapshot().await;
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.displayed_text(), "login root\nlogin admin");

    viewer.set_search("ADMIN").await;
    assert_eq!(viewer.displayed_text().await, "login admin");
}

#[tokio::test]
async fn test_empty_container_logs_placeholder() {
    let api = Arc::new(ssh_api());
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.select(ssh_honeypot(&api).await).await;

    assert_eq!(viewer.snapshot().await.text, "No container logs available");
}

#[tokio::test]
async fn test_backend_error_payload() {
    let api = Arc::new(ssh_api().with_container_logs(LogsResponse {
        error: Some(json!(true)),
        message: Some("container not found".to_string()),
        ..Default::default()
    }));
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.select(ssh_honeypot(&api).await).await;

    let state = viewer.snapshot().await;
    assert_eq!(
        state.error.as_deref(),
        Some("Failed to load container logs: container not found")
    );
}

#[tokio::test]
async fn test_missing_container_id() {
    let api = Arc::new(FakeApi::new().with_services(json!([{"name": "ssh"}])));
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.select(ssh_honeypot(&api).await).await;

    assert_eq!(
        viewer.snapshot().await.text,
        "No container ID available for this honeypot"
    );
    assert!(api.log_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_source_and_kind_switch_refetches() {
    let api = Arc::new(ssh_api());
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()))
        .with_structured_limit(25);
    viewer.select(ssh_honeypot(&api).await).await;
    viewer.set_source(LogSource::Real).await;
    viewer.set_kind(RealLogKind::Commands).await;
    viewer.set_source(LogSource::Structured).await;

    assert_eq!(
        api.log_requests.lock().unwrap().as_slice(),
        &[
            "container:c-ssh".to_string(),
            "real:c-ssh:auth".to_string(),
            "real:c-ssh:commands".to_string(),
            "structured:c-ssh:commands:25".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_structured_filters() {
    let api = Arc::new(ssh_api().with_structured(StructuredLogsResponse {
        logs: vec![
            entry("warning", "high", "FAILED_LOGIN"),
            entry("info", "low", "SUCCESSFUL_LOGIN"),
            entry("warning", "medium", "FAILED_LOGIN"),
        ],
        statistics: [("total_events".to_string(), json!(3))].into_iter().collect(),
        ..Default::default()
    }));
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.set_source(LogSource::Structured).await;
    viewer.select(ssh_honeypot(&api).await).await;

    viewer.set_level_filter(Some("warning".to_string())).await;
    let state = viewer.snapshot().await;
    assert_eq!(state.entries.len(), 3);
    assert_eq!(state.filtered_entries().len(), 2);
    assert_eq!(state.statistics["total_events"], json!(3));

    viewer.set_threat_filter(Some("high".to_string())).await;
    let text = viewer.displayed_text().await;
    assert_eq!(text.lines().count(), 1);
    assert!(text.contains("Failed login attempt from 10.0.0.9 for user \"root\""));

    viewer.set_level_filter(Some("all".to_string())).await;
    viewer.set_threat_filter(None).await;
    assert_eq!(viewer.snapshot().await.filtered_entries().len(), 3);
}

#[tokio::test]
async fn test_download_writes_displayed_text() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(ssh_api().with_container_logs(LogsResponse {
        logs: Some("line one\nline two".to_string()),
        ..Default::default()
    }));
    let notifications = Arc::new(NotificationCenter::new());
    let viewer = LogsViewer::new(api.clone(), notifications.clone());
    viewer.select(ssh_honeypot(&api).await).await;

    let path = viewer.download(dir.path()).await.unwrap().unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        format!("ssh-2222_container_logs_{}.txt", today())
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "line one\nline two");
    assert_eq!(notifications.current().unwrap().title, "Logs Downloaded");
}

#[tokio::test]
async fn test_download_nothing_warns() {
    let dir = tempfile::tempdir().unwrap();
    let api = Arc::new(ssh_api().with_container_logs(LogsResponse {
        logs: Some("only line".to_string()),
        ..Default::default()
    }));
    let notifications = Arc::new(NotificationCenter::new());
    let viewer = LogsViewer::new(api.clone(), notifications.clone());
    viewer.select(ssh_honeypot(&api).await).await;
    viewer.set_search("nothing matches this").await;

    assert!(viewer.download(dir.path()).await.unwrap().is_none());
    let shown = notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Warning);
    assert_eq!(shown.title, "No Logs to Download");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_failed_fetch_after_switching_target_drops_old_entries() {
    let api = Arc::new(
        FakeApi::new()
            .with_services(json!([
                {"name": "ssh", "container_id": "c-ssh", "config": {"port": 2222}},
                {"name": "api", "container_id": "c-api", "config": {"port": 8080}}
            ]))
            .with_structured(StructuredLogsResponse {
                logs: vec![LogEntry {
                    event_type: Some("COMMAND_EXECUTED".to_string()),
                    command: Some("cat /etc/shadow".to_string()),
                    ..Default::default()
                }],
                statistics: [("total_events".to_string(), json!(1))].into_iter().collect(),
                ..Default::default()
            }),
    );
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();
    let honeypots = view.snapshot().await.honeypots;

    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.set_source(LogSource::Structured).await;
    viewer.select(honeypots[0].clone()).await;
    assert_eq!(viewer.snapshot().await.entries.len(), 1);

    *api.structured.lock().unwrap() = Some(StructuredLogsResponse {
        error: Some(json!("boom")),
        message: Some("boom".to_string()),
        ..Default::default()
    });
    viewer.select(honeypots[1].clone()).await;

    let state = viewer.snapshot().await;
    assert_eq!(state.target.as_ref().map(|t| t.name.as_str()), Some("api-8080"));
    assert_eq!(state.error.as_deref(), Some("boom"));
    assert!(state.entries.is_empty());
    assert!(state.statistics.is_empty());
    assert_eq!(state.displayed_text(), "");
}

#[tokio::test]
async fn test_stats_follow_filters() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let request = |ip: &str, method: &str, path: &str, level: &str, at: &str| LogEntry {
        event_type: Some("API_REQUEST".to_string()),
        ip: Some(ip.to_string()),
        method: Some(method.to_string()),
        path: Some(path.to_string()),
        level: Some(level.to_string()),
        threat_level: Some(if level == "info" { "low" } else { "high" }.to_string()),
        timestamp: Some(at.to_string()),
        ..Default::default()
    };
    let api = Arc::new(ssh_api().with_structured(StructuredLogsResponse {
        logs: vec![
            request("10.0.0.1", "GET", "/wp-admin", "warning", "2024-03-01T11:30:00Z"),
            request("10.0.0.1", "POST", "/api/login", "warning", "2024-03-01T11:45:00"),
            request("10.0.0.2", "GET", "/api/status", "info", "2024-03-01T09:00:00Z"),
            entry("warning", "high", "FAILED_LOGIN"),
        ],
        ..Default::default()
    }));
    let viewer = LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new()));
    viewer.set_source(LogSource::Structured).await;
    viewer.select(ssh_honeypot(&api).await).await;

    let stats = viewer.snapshot().await.stats_at(now);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.failed_logins, 1);
    assert_eq!(stats.unique_ips, 3);
    assert_eq!(stats.unique_paths, 3);
    assert_eq!(stats.last_hour, 2);
    assert_eq!(stats.suspicious_requests, 2);
    assert_eq!(stats.top_ip.as_deref(), Some("10.0.0.1"));
    assert_eq!(stats.top_method.as_deref(), Some("GET"));
    assert_eq!(stats.success_rate, 25.0);
    assert_eq!(stats.failure_rate, 75.0);

    viewer.set_threat_filter(Some("low".to_string())).await;
    let stats = viewer.snapshot().await.stats_at(now);
    assert_eq!(stats.total, 1);
    assert_eq!(stats.top_ip.as_deref(), Some("10.0.0.2"));
    assert_eq!(stats.suspicious_requests, 0);
}
