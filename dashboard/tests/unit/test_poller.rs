//! Worker loop tests

use std::sync::Arc;
use std::time::Duration;

use honeydash::dashboard::view::DashboardView;
use honeydash::notify::center::NotificationCenter;
use honeydash::viewer::logs::LogsViewer;
use honeydash::workers::{log_refresh, poller};
use serde_json::json;
use tokio::sync::oneshot;

use crate::fake_api::FakeApi;

#[tokio::test(start_paused = true)]
async fn test_poller_polls_immediately_then_every_interval() {
    let api = Arc::new(FakeApi::new());
    let view = Arc::new(DashboardView::new(api.clone()));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = {
        let view = view.clone();
        tokio::spawn(async move {
            poller::run(
                &poller::Options::default(),
                view.as_ref(),
                tokio::time::sleep,
                Box::pin(async move {
                    let _ = stop_rx.await;
                }),
            )
            .await;
        })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(api.list_calls(), 1);

    tokio::time::sleep(Duration::from_secs(8)).await;
    assert_eq!(api.list_calls(), 3);

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
    let calls = api.list_calls();
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(api.list_calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_poller_survives_failures() {
    let api = Arc::new(FakeApi::new());
    api.fail_list("down");
    let view = Arc::new(DashboardView::new(api.clone()));
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let handle = {
        let view = view.clone();
        tokio::spawn(async move {
            poller::run(
                &poller::Options::default(),
                view.as_ref(),
                tokio::time::sleep,
                Box::pin(async move {
                    let _ = stop_rx.await;
                }),
            )
            .await;
        })
    };

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(api.list_calls(), 2);
    assert!(view.connection_error().await.is_some());

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_log_refresh_only_when_enabled() {
    let api = Arc::new(
        FakeApi::new().with_services(json!([{"name": "ssh", "container_id": "c1", "config": {"port": 2222}}])),
    );
    let view = DashboardView::new(api.clone());
    view.poll().await.unwrap();
    let target = view.find("c1").await.unwrap();

    let viewer = Arc::new(LogsViewer::new(api.clone(), Arc::new(NotificationCenter::new())));
    viewer.select(target).await;
    assert_eq!(api.log_requests.lock().unwrap().len(), 1);

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = {
        let viewer = viewer.clone();
        tokio::spawn(async move {
            log_refresh::run(
                &log_refresh::Options::default(),
                viewer.as_ref(),
                tokio::time::sleep,
                Box::pin(async move {
                    let _ = stop_rx.await;
                }),
            )
            .await;
        })
    };

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(api.log_requests.lock().unwrap().len(), 1);

    viewer.set_auto_refresh(true).await;
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(api.log_requests.lock().unwrap().len(), 3);

    stop_tx.send(()).unwrap();
    handle.await.unwrap();
}
