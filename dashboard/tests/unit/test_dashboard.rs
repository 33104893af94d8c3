//! Dashboard view tests

use std::sync::Arc;

use backend_api::models::StopServiceRequest;
use serde_json::json;

use honeydash::dashboard::view::{DashboardCounts, DashboardView};

use crate::fake_api::FakeApi;

fn two_services() -> serde_json::Value {
    json!([
        {"name": "ssh", "container_id": "c-ssh", "config": {"port": 2222}},
        {"name": "mysql", "container_id": "c-sql", "status": "exited", "config": {"port": "3306"}}
    ])
}

#[tokio::test]
async fn test_loading_until_first_poll() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = DashboardView::new(api.clone());
    assert!(view.is_loading().await);

    view.poll().await.unwrap();
    assert!(!view.is_loading().await);

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.honeypots.len(), 2);
    assert_eq!(snapshot.honeypots[1].name, "mysql-3306");
    assert_eq!(
        snapshot.counts,
        DashboardCounts {
            total: 2,
            running: 1,
            stopped: 1
        }
    );
    assert!(snapshot.last_refresh.is_some());
}

#[tokio::test]
async fn test_failed_poll_keeps_collection() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();

    api.fail_list("backend unavailable");
    assert!(view.poll().await.is_err());

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.honeypots.len(), 2);
    assert_eq!(
        snapshot.connection_error.as_deref(),
        Some("Failed to connect to API: backend unavailable")
    );

    *api.services.lock().unwrap() = Ok(Vec::new());
    view.retry().await.unwrap();
    assert!(view.connection_error().await.is_none());
    assert_eq!(view.counts().await.total, 0);
}

#[tokio::test]
async fn test_search_by_name_or_type() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = DashboardView::new(api);
    view.poll().await.unwrap();

    assert_eq!(view.search("SQL").await.len(), 1);
    assert_eq!(view.search("2222").await[0].identifier, "c-ssh");
    assert_eq!(view.search("").await.len(), 2);
    assert!(view.search("redis").await.is_empty());
}

#[tokio::test]
async fn test_stop_sends_runtime_id_and_repolls() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();

    let honeypot = view.find("c-ssh").await.unwrap();
    view.stop(&honeypot).await.unwrap();

    assert_eq!(
        api.stopped.lock().unwrap().as_slice(),
        &[StopServiceRequest::container("c-ssh")]
    );
    assert_eq!(api.list_calls(), 2);
}

#[tokio::test]
async fn test_stop_without_id_is_refused() {
    let api = Arc::new(FakeApi::new().with_services(json!([{"name": "redis"}])));
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();

    let honeypot = view.find("service-0").await.unwrap();
    assert!(view.stop(&honeypot).await.is_err());
    assert!(api.stopped.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_start_resubmits_config_snapshot() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();

    let honeypot = view.find("c-sql").await.unwrap();
    view.start(&honeypot).await.unwrap();
    assert_eq!(api.started.lock().unwrap()[0], json!({"port": "3306"}));
}

#[tokio::test]
async fn test_subscribers_see_each_poll() {
    let api = Arc::new(FakeApi::new());
    let view = DashboardView::new(api);
    let mut updates = view.subscribe();

    view.poll().await.unwrap();
    assert!(updates.has_changed().unwrap());
    updates.borrow_and_update();
    view.poll().await.unwrap();
    assert!(updates.has_changed().unwrap());
}

#[tokio::test]
async fn test_notified_subscriber_reads_final_state() {
    let api = Arc::new(FakeApi::new().with_services(two_services()));
    let view = Arc::new(DashboardView::new(api.clone()));
    let mut updates = view.subscribe();

    let reader = {
        let view = view.clone();
        tokio::spawn(async move {
            updates.changed().await.unwrap();
            view.snapshot().await
        })
    };

    view.poll().await.unwrap();
    let seen = reader.await.unwrap();
    assert_eq!(seen.honeypots.len(), 2);
    assert!(!seen.loading);
    assert!(seen.last_refresh.is_some());

    let mut updates = view.subscribe();
    api.fail_list("connection refused");
    assert!(view.poll().await.is_err());
    assert!(updates.has_changed().unwrap());
    let seen = view.snapshot().await;
    assert_eq!(seen.honeypots.len(), 2);
    assert!(seen.connection_error.is_some());
}
