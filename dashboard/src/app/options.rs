//! Application configuration options

use std::time::Duration;

use crate::deploy::progress::DeploySettings;
use crate::http::logs::DEFAULT_STRUCTURED_LIMIT;
use crate::storage::layout::StorageLayout;
use crate::storage::settings::{Settings, DEFAULT_API_URL};
use crate::workers::{log_refresh, poller};

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub api_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Storage paths
    pub layout: StorageLayout,

    /// Poller worker options
    pub poller: poller::Options,

    /// Log refresh worker options
    pub log_refresh: log_refresh::Options,

    /// Progress ticker settings for deploys
    pub deploy: DeploySettings,

    /// Structured log entries per fetch
    pub structured_log_limit: u32,

    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(180),
            layout: StorageLayout::default(),
            poller: poller::Options::default(),
            log_refresh: log_refresh::Options::default(),
            deploy: DeploySettings::default(),
            structured_log_limit: DEFAULT_STRUCTURED_LIMIT,
            max_shutdown_delay: Duration::from_secs(10),
        }
    }
}

impl AppOptions {
    /// Options derived from saved settings
    pub fn from_settings(settings: &Settings, layout: StorageLayout) -> Self {
        let refresh = Duration::from_secs(settings.refresh_interval_secs.max(1));
        Self {
            api_url: settings.network.api_url.clone(),
            request_timeout: Duration::from_secs(settings.network.timeout_secs.max(1)),
            layout,
            log_refresh: log_refresh::Options { interval: refresh },
            structured_log_limit: settings.advanced.max_log_entries,
            ..Default::default()
        }
    }
}
