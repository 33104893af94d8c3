//! Deploy workflow tests

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use honeydash::catalog::ServiceType;
use honeydash::config::honeypot::{HoneypotConfig, SshUser};
use honeydash::deploy::classify::{DeployFailure, DeployMode};
use honeydash::deploy::progress::{DeployProgressState, DeploySettings, Phase};
use honeydash::deploy::workflow::{DeployOutcome, DeployWorkflow};
use honeydash::errors::DashboardError;
use honeydash::models::notification::NotificationKind;
use honeydash::notify::center::NotificationCenter;

use crate::fake_api::FakeApi;

fn workflow(api: Arc<FakeApi>, notifications: Arc<NotificationCenter>) -> DeployWorkflow {
    DeployWorkflow::new(api, notifications, DeploySettings::default(), DeployMode::Create)
}

#[tokio::test(start_paused = true)]
async fn test_out_of_range_port_never_reaches_backend() {
    let api = Arc::new(FakeApi::new());
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = workflow(api.clone(), notifications.clone());

    let mut config = HoneypotConfig::defaults(ServiceType::Ssh);
    config.port = Some(70_000);

    let outcome = workflow.submit(&config, || async {}).await;
    assert!(matches!(outcome, DeployOutcome::Rejected(ref issue) if issue.field == "port"));
    assert_eq!(api.start_calls(), 0);
    assert_eq!(notifications.current().unwrap().kind, NotificationKind::Warning);
    assert_eq!(workflow.progress(), DeployProgressState::idle());
}

#[tokio::test(start_paused = true)]
async fn test_blank_ssh_password_is_rejected() {
    let api = Arc::new(FakeApi::new());
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = workflow(api.clone(), notifications.clone());

    let mut config = HoneypotConfig::defaults(ServiceType::Ssh);
    if let honeydash::config::honeypot::ServiceSettings::Ssh(ssh) = &mut config.settings {
        ssh.users.push(SshUser::new("guest", "", false));
    }

    let outcome = workflow.submit(&config, || async {}).await;
    match outcome {
        DeployOutcome::Rejected(issue) => assert_eq!(
            issue.message,
            "Please fill in all username and password fields for SSH users"
        ),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(api.start_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_ssh_deploy_sends_encoded_users() {
    let api = Arc::new(FakeApi::new());
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = workflow(api.clone(), notifications.clone());
    let refreshed = Arc::new(AtomicBool::new(false));

    let config = HoneypotConfig::defaults(ServiceType::Ssh);
    let flag = refreshed.clone();
    let outcome = workflow
        .submit(&config, || async move {
            flag.store(true, Ordering::SeqCst);
        })
        .await;

    assert!(matches!(outcome, DeployOutcome::Deployed { port: 2222, .. }));
    assert!(refreshed.load(Ordering::SeqCst));

    let sent = api.started.lock().unwrap()[0].clone();
    assert_eq!(sent["name"], "ssh");
    assert_eq!(sent["port"], 2222);
    let users: Vec<SshUser> = serde_json::from_str(sent["users"].as_str().unwrap()).unwrap();
    assert_eq!(users, vec![SshUser::new("admin", "admin123", true)]);

    let shown = notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Success);
    assert_eq!(shown.title, "Honeypot Created");
    assert!(shown.message.contains("2222"));
    assert_eq!(workflow.progress(), DeployProgressState::idle());
}

#[tokio::test(start_paused = true)]
async fn test_bind_failure_is_a_port_conflict() {
    let api = Arc::new(FakeApi::new().fail_start(DashboardError::ApiError {
        status: 500,
        message: "driver failed programming external connectivity: Bind for 0.0.0.0:2222 failed: port is already allocated".to_string(),
    }));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = workflow(api.clone(), notifications.clone());

    let outcome = workflow
        .submit(&HoneypotConfig::defaults(ServiceType::Ssh), || async {})
        .await;

    assert_eq!(outcome, DeployOutcome::Failed(DeployFailure::PortConflict { port: 2222 }));
    let shown = notifications.current().unwrap();
    assert_eq!(shown.kind, NotificationKind::Error);
    assert_eq!(shown.title, "Port Conflict");
    assert!(shown.message.contains("2222"));
    assert!(workflow.can_submit());
    assert_eq!(workflow.progress(), DeployProgressState::idle());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_mentions_still_starting() {
    let api = Arc::new(FakeApi::new().fail_start(DashboardError::Timeout(180)));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = workflow(api.clone(), notifications.clone());

    let outcome = workflow
        .submit(&HoneypotConfig::defaults(ServiceType::Mysql), || async {})
        .await;

    assert_eq!(outcome, DeployOutcome::Failed(DeployFailure::Timeout { seconds: 180 }));
    let shown = notifications.current().unwrap();
    assert_eq!(shown.title, "Request Timed Out");
    assert!(shown.message.contains("may still be starting"));
}

#[tokio::test(start_paused = true)]
async fn test_second_submit_while_running_is_busy() {
    let api = Arc::new(FakeApi::new().with_start_delay(Duration::from_secs(10)));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = Arc::new(workflow(api.clone(), notifications.clone()));
    let config = HoneypotConfig::defaults(ServiceType::Redis);

    let first = {
        let workflow = workflow.clone();
        let config = config.clone();
        tokio::spawn(async move { workflow.submit(&config, || async {}).await })
    };
    while !workflow.progress().is_running() {
        tokio::task::yield_now().await;
    }
    assert!(!workflow.can_submit());

    let second = workflow.submit(&config, || async {}).await;
    assert_eq!(second, DeployOutcome::Busy);

    let first = first.await.unwrap();
    assert!(matches!(first, DeployOutcome::Deployed { port: 6379, .. }));
    assert_eq!(api.start_calls(), 1);
    assert!(workflow.can_submit());
}

#[tokio::test(start_paused = true)]
async fn test_submit_during_completion_delay_is_busy() {
    let api = Arc::new(FakeApi::new().with_start_delay(Duration::from_secs(10)));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = Arc::new(workflow(api.clone(), notifications.clone()));
    let config = HoneypotConfig::defaults(ServiceType::Ssh);

    let first = {
        let workflow = workflow.clone();
        let config = config.clone();
        tokio::spawn(async move { workflow.submit(&config, || async {}).await })
    };

    tokio::time::sleep(Duration::from_millis(10_100)).await;
    assert_eq!(workflow.progress().phase, Phase::Succeeded);
    assert!(!workflow.can_submit());
    assert_eq!(workflow.submit(&config, || async {}).await, DeployOutcome::Busy);

    let first = first.await.unwrap();
    assert!(matches!(first, DeployOutcome::Deployed { port: 2222, .. }));
    assert_eq!(api.start_calls(), 1);
    assert!(workflow.can_submit());
    assert_eq!(workflow.progress(), DeployProgressState::idle());

    let third = workflow.submit(&config, || async {}).await;
    assert!(matches!(third, DeployOutcome::Deployed { .. }));
    assert_eq!(api.start_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_progress_advances_while_waiting() {
    let api = Arc::new(FakeApi::new().with_start_delay(Duration::from_secs(10)));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = Arc::new(workflow(api.clone(), notifications));
    let config = HoneypotConfig::defaults(ServiceType::Ssh);

    let handle = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.submit(&config, || async {}).await })
    };

    tokio::time::sleep(Duration::from_secs(6)).await;
    let progress = workflow.progress();
    assert!(progress.is_running());
    assert!(progress.simulated_percent >= 50.0, "got {}", progress.simulated_percent);
    assert!(progress.simulated_percent <= 95.0);
    assert_eq!(progress.status_message, "Creating honeypot...");

    handle.await.unwrap();
    assert_eq!(workflow.progress(), DeployProgressState::idle());
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_submit_resets_progress() {
    let api = Arc::new(FakeApi::new().with_start_delay(Duration::from_secs(60)));
    let notifications = Arc::new(NotificationCenter::new());
    let workflow = Arc::new(workflow(api.clone(), notifications));
    let config = HoneypotConfig::defaults(ServiceType::Ssh);

    let handle = {
        let workflow = workflow.clone();
        tokio::spawn(async move { workflow.submit(&config, || async {}).await })
    };
    while !workflow.progress().is_running() {
        tokio::task::yield_now().await;
    }

    handle.abort();
    let _ = handle.await;
    assert_eq!(workflow.progress(), DeployProgressState::idle());
    assert!(workflow.can_submit());
}
