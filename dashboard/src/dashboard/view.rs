//! Running honeypots list

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

use crate::catalog::{self, ServiceDescriptor};
use crate::errors::DashboardError;
use crate::http::api::HoneypotApi;
use crate::models::honeypot::{HoneypotStatus, RunningHoneypot};
use crate::utils::contains_ignore_case;

/// Derived counts shown above the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardCounts {
    pub total: usize,
    pub running: usize,
    pub stopped: usize,
}

impl DashboardCounts {
    pub fn from_honeypots(honeypots: &[RunningHoneypot]) -> Self {
        Self {
            total: honeypots.len(),
            running: honeypots
                .iter()
                .filter(|h| h.status == HoneypotStatus::Running)
                .count(),
            stopped: honeypots
                .iter()
                .filter(|h| h.status == HoneypotStatus::Stopped)
                .count(),
        }
    }
}

/// Everything the list view renders
#[derive(Debug, Clone, Serialize)]
pub struct DashboardState {
    pub honeypots: Vec<RunningHoneypot>,
    pub counts: DashboardCounts,
    /// True until the first poll resolves
    pub loading: bool,
    /// Set while the backend is unreachable
    pub connection_error: Option<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            honeypots: Vec::new(),
            counts: DashboardCounts::default(),
            loading: true,
            connection_error: None,
            last_refresh: None,
        }
    }
}

/// Dashboard list backed by periodic polls
pub struct DashboardView {
    api: Arc<dyn HoneypotApi>,
    state: RwLock<DashboardState>,
    /// Bumped after every poll
    revision: watch::Sender<u64>,
}

impl DashboardView {
    pub fn new(api: Arc<dyn HoneypotApi>) -> Self {
        Self {
            api,
            state: RwLock::new(DashboardState::default()),
            revision: watch::Sender::new(0),
        }
    }

    /// Receiver notified after every poll, successful or not
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn counts(&self) -> DashboardCounts {
        self.state.read().await.counts
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }

    pub async fn connection_error(&self) -> Option<String> {
        self.state.read().await.connection_error.clone()
    }

    /// Fetch the service list and replace the collection wholesale
    ///
    /// On failure the previous collection is kept and the connection error
    /// is set.
    pub async fn poll(&self) -> Result<(), DashboardError> {
        debug!("Polling services...");
        let result = self.api.list_services().await;

        let outcome = {
            let mut state = self.state.write().await;
            state.loading = false;
            match result {
                Ok(instances) => {
                    let honeypots: Vec<RunningHoneypot> = instances
                        .iter()
                        .enumerate()
                        .map(|(i, instance)| RunningHoneypot::from_instance(i, instance))
                        .collect();
                    state.counts = DashboardCounts::from_honeypots(&honeypots);
                    state.honeypots = honeypots;
                    state.connection_error = None;
                    state.last_refresh = Some(Utc::now());
                    Ok(())
                }
                Err(e) => {
                    warn!("Failed to fetch services: {}", e);
                    state.connection_error = Some(format!("Failed to connect to API: {}", e));
                    Err(e)
                }
            }
        };
        self.revision.send_modify(|r| *r += 1);
        outcome
    }

    /// Manual retry from the connection-error banner
    pub async fn retry(&self) -> Result<(), DashboardError> {
        self.poll().await
    }

    /// Honeypots whose name or type contains `term`
    pub async fn search(&self, term: &str) -> Vec<RunningHoneypot> {
        self.state
            .read()
            .await
            .honeypots
            .iter()
            .filter(|h| contains_ignore_case(&h.name, term) || contains_ignore_case(&h.service_name, term))
            .cloned()
            .collect()
    }

    /// Catalog entries whose name or description contains `term`
    pub fn search_catalog(&self, term: &str) -> Vec<&'static ServiceDescriptor> {
        catalog::search(term)
    }

    pub async fn find(&self, identifier: &str) -> Option<RunningHoneypot> {
        self.state
            .read()
            .await
            .honeypots
            .iter()
            .find(|h| h.identifier == identifier)
            .cloned()
    }

    /// Stop a honeypot, then re-poll
    pub async fn stop(&self, honeypot: &RunningHoneypot) -> Result<(), DashboardError> {
        let request = honeypot.stop_request().ok_or_else(|| {
            DashboardError::NotFound(format!(
                "{} has no container or process id",
                honeypot.name
            ))
        })?;
        info!("Stopping {} ({})", honeypot.name, honeypot.identifier);
        self.api.stop_service(&request).await?;
        self.refresh_after_action().await;
        Ok(())
    }

    /// Remove a honeypot; the backend drops stopped services from the list
    pub async fn delete(&self, honeypot: &RunningHoneypot) -> Result<(), DashboardError> {
        self.stop(honeypot).await
    }

    /// Re-submit the honeypot's config snapshot, then re-poll
    pub async fn start(&self, honeypot: &RunningHoneypot) -> Result<Value, DashboardError> {
        if !honeypot.config.is_object() {
            return Err(DashboardError::ValidationError(format!(
                "{} has no stored configuration",
                honeypot.name
            )));
        }
        info!("Starting {} from its stored config", honeypot.name);
        let response = self.api.start_service(&honeypot.config).await?;
        self.refresh_after_action().await;
        Ok(response)
    }

    async fn refresh_after_action(&self) {
        if let Err(e) = self.poll().await {
            debug!("Refresh after action failed: {}", e);
        }
    }
}
