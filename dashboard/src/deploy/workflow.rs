//! Deploy/save workflow: validate, submit, report

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::honeypot::HoneypotConfig;
use crate::config::registry::{self, ValidationIssue};
use crate::config::transport::to_transport;
use crate::deploy::classify::{classify, success_notification, DeployFailure, DeployMode};
use crate::deploy::progress::{DeployProgressState, DeploySettings, ProgressEvent};
use crate::http::api::HoneypotApi;
use crate::models::notification::Notification;
use crate::notify::center::NotificationCenter;

/// Result of one submission
#[derive(Debug, Clone, PartialEq)]
pub enum DeployOutcome {
    /// Client-side validation failed; nothing was sent
    Rejected(ValidationIssue),
    /// A deploy was already running; nothing was sent
    Busy,
    Deployed { port: u16, response: Value },
    Failed(DeployFailure),
}

/// Drives one honeypot submission at a time
pub struct DeployWorkflow {
    api: Arc<dyn HoneypotApi>,
    notifications: Arc<NotificationCenter>,
    settings: DeploySettings,
    mode: DeployMode,
    progress: Arc<watch::Sender<DeployProgressState>>,
    /// Held from the busy check until the submission's guard drops
    in_flight: Arc<AtomicBool>,
}

/// Owns the in-flight slot for one submission
///
/// Dropping it stops the ticker, resets progress and releases the slot,
/// however the submission ends.
struct RunGuard {
    progress: Arc<watch::Sender<DeployProgressState>>,
    in_flight: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl RunGuard {
    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.stop_ticker();
        self.progress.send_modify(|state| {
            let _ = state.process(ProgressEvent::Reset);
        });
        self.in_flight.store(false, Ordering::Release);
    }
}

impl DeployWorkflow {
    pub fn new(
        api: Arc<dyn HoneypotApi>,
        notifications: Arc<NotificationCenter>,
        settings: DeploySettings,
        mode: DeployMode,
    ) -> Self {
        Self {
            api,
            notifications,
            settings,
            mode,
            progress: Arc::new(watch::Sender::new(DeployProgressState::idle())),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn mode(&self) -> DeployMode {
        self.mode
    }

    /// Current progress snapshot
    pub fn progress(&self) -> DeployProgressState {
        self.progress.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DeployProgressState> {
        self.progress.subscribe()
    }

    /// Whether the submit control should be enabled
    ///
    /// Stays false through the completion delay and the success refresh.
    pub fn can_submit(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Option<RunGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(RunGuard {
            progress: self.progress.clone(),
            in_flight: self.in_flight.clone(),
            ticker: None,
        })
    }

    /// Validate and submit `config`, running `on_success` after a deploy
    ///
    /// The config is borrowed so a failed submission leaves it editable.
    pub async fn submit<F, Fut>(&self, config: &HoneypotConfig, on_success: F) -> DeployOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let Some(mut guard) = self.acquire() else {
            debug!("Submit ignored, deploy already running");
            return DeployOutcome::Busy;
        };

        let validated = match registry::validate(config) {
            Ok(validated) => validated,
            Err(issue) => {
                warn!("Config rejected: {}", issue);
                self.notifications
                    .show(Notification::warning("Invalid Configuration", issue.message.clone()));
                return DeployOutcome::Rejected(issue);
            }
        };
        let port = validated.port;

        let transport = match to_transport(&validated.config) {
            Ok(transport) => transport,
            Err(e) => {
                let failure = classify(&e, port);
                self.notifications.show(failure.notification(self.mode));
                return DeployOutcome::Failed(failure);
            }
        };

        self.progress.send_modify(|state| {
            *state = DeployProgressState::idle();
            let _ = state.process(ProgressEvent::Start);
        });
        guard.ticker = Some(self.spawn_ticker());

        info!("Submitting {} honeypot on port {}", config.service_name(), port);
        let result = self.api.start_service(&transport).await;
        guard.stop_ticker();

        match result {
            Ok(response) => {
                self.progress.send_modify(|state| {
                    let _ = state.process(ProgressEvent::Succeed);
                });
                tokio::time::sleep(self.settings.completion_delay).await;

                let label = config
                    .service_type()
                    .map(|t| t.label().to_string())
                    .unwrap_or_else(|| config.service_name().to_uppercase());
                self.notifications
                    .show(success_notification(self.mode, &label, port));
                on_success().await;
                DeployOutcome::Deployed { port, response }
            }
            Err(e) => {
                error!("Deploy failed: {}", e);
                self.progress.send_modify(|state| {
                    let _ = state.process(ProgressEvent::Fail);
                });
                let failure = classify(&e, port);
                self.notifications.show(failure.notification(self.mode));
                DeployOutcome::Failed(failure)
            }
        }
    }

    fn spawn_ticker(&self) -> JoinHandle<()> {
        let progress = self.progress.clone();
        let tick_interval = self.settings.tick_interval;
        tokio::spawn(async move {
            let started_at = Instant::now();
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                let elapsed = started_at.elapsed().as_secs_f64();
                progress.send_modify(|state| state.tick(elapsed));
            }
        })
    }
}
