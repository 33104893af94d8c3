//! Deploy failure classification

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::DashboardError;
use crate::models::notification::Notification;

/// Whether the workflow creates a new honeypot or saves an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeployMode {
    #[default]
    Create,
    Save,
}

impl DeployMode {
    fn failure_title(&self) -> &'static str {
        match self {
            DeployMode::Create => "Failed to Create Honeypot",
            DeployMode::Save => "Failed to Save Honeypot",
        }
    }

    fn success_title(&self) -> &'static str {
        match self {
            DeployMode::Create => "Honeypot Created",
            DeployMode::Save => "Honeypot Saved",
        }
    }

    fn fallback_message(&self) -> &'static str {
        match self {
            DeployMode::Create => "An unknown error occurred while starting the service.",
            DeployMode::Save => "An unknown error occurred while saving the configuration.",
        }
    }
}

/// Why a submission failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployFailure {
    /// Another listener already holds the port
    PortConflict { port: u16 },
    /// The client gave up; the backend may still finish
    Timeout { seconds: u64 },
    Backend { message: Option<String> },
}

/// Docker's bind failure, e.g. `Bind for 0.0.0.0:2222 failed`
static BIND_FAILED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bind for .*:(\d+) failed").expect("Invalid BIND_FAILED_PATTERN")
});

/// Classify a start/save error for the port that was requested
pub fn classify(err: &DashboardError, requested_port: u16) -> DeployFailure {
    if let DashboardError::Timeout(seconds) = err {
        return DeployFailure::Timeout { seconds: *seconds };
    }

    let message = err.backend_message();
    if let Some(text) = message.as_deref() {
        if let Some(caps) = BIND_FAILED_PATTERN.captures(text) {
            let port = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(requested_port);
            return DeployFailure::PortConflict { port };
        }
        if text.contains("port is already allocated") {
            return DeployFailure::PortConflict {
                port: requested_port,
            };
        }
    }

    DeployFailure::Backend { message }
}

impl DeployFailure {
    /// Error notification shown to the operator
    pub fn notification(&self, mode: DeployMode) -> Notification {
        match self {
            DeployFailure::PortConflict { port } => Notification::error(
                "Port Conflict",
                format!(
                    "Port {} is already in use. Choose a different port and try again.",
                    port
                ),
            ),
            DeployFailure::Timeout { seconds } => Notification::error(
                "Request Timed Out",
                format!(
                    "No response after {} seconds. The honeypot may still be starting; check the dashboard shortly.",
                    seconds
                ),
            ),
            DeployFailure::Backend { message } => Notification::error(
                mode.failure_title(),
                message
                    .clone()
                    .unwrap_or_else(|| mode.fallback_message().to_string()),
            ),
        }
    }
}

/// Success notification naming the service and port
pub fn success_notification(mode: DeployMode, service_label: &str, port: u16) -> Notification {
    let verb = match mode {
        DeployMode::Create => "is now running",
        DeployMode::Save => "configuration was saved",
    };
    Notification::success(
        mode.success_title(),
        format!("{} honeypot on port {} {}.", service_label, port, verb),
    )
}
