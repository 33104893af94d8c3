//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::dashboard::view::DashboardView;
use crate::deploy::classify::DeployMode;
use crate::deploy::workflow::DeployWorkflow;
use crate::errors::DashboardError;
use crate::http::api::HoneypotApi;
use crate::http::client::HttpClient;
use crate::notify::center::NotificationCenter;
use crate::storage::settings::SettingsStore;
use crate::viewer::logs::LogsViewer;

/// Shared state behind every command
pub struct AppState {
    /// Backend API
    pub api: Arc<dyn HoneypotApi>,

    /// Notification slot
    pub notifications: Arc<NotificationCenter>,

    /// Running honeypots list
    pub dashboard: Arc<DashboardView>,

    /// Logs viewer
    pub logs: Arc<LogsViewer>,

    /// Settings file
    pub settings: SettingsStore,

    options: AppOptions,
}

impl AppState {
    /// Initialize application state against the configured backend
    pub fn init(options: &AppOptions) -> Result<Self, DashboardError> {
        info!("Initializing application state...");
        let http_client = HttpClient::new(&options.api_url, options.request_timeout)?;
        Ok(Self::with_api(Arc::new(http_client), options))
    }

    /// Build state around any [`HoneypotApi`] implementation
    pub fn with_api(api: Arc<dyn HoneypotApi>, options: &AppOptions) -> Self {
        let notifications = Arc::new(NotificationCenter::new());
        let dashboard = Arc::new(DashboardView::new(api.clone()));
        let logs = Arc::new(
            LogsViewer::new(api.clone(), notifications.clone())
                .with_structured_limit(options.structured_log_limit),
        );
        let settings = SettingsStore::new(options.layout.settings_file());

        Self {
            api,
            notifications,
            dashboard,
            logs,
            settings,
            options: options.clone(),
        }
    }

    /// Fresh workflow for one create or save form
    pub fn deploy_workflow(&self, mode: DeployMode) -> DeployWorkflow {
        DeployWorkflow::new(
            self.api.clone(),
            self.notifications.clone(),
            self.options.deploy.clone(),
            mode,
        )
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }
}
