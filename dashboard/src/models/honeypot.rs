//! Running honeypot view model

use std::fmt;

use backend_api::models::{ServiceInstance, StopServiceRequest};
use serde::Serialize;
use serde_json::Value;

use crate::catalog::ServiceType;

/// What backs a running decoy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    Container,
    Process,
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeKind::Container => f.write_str("container"),
            RuntimeKind::Process => f.write_str("process"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoneypotStatus {
    Running,
    Stopped,
}

impl HoneypotStatus {
    /// Listed services are running unless the backend says otherwise
    fn from_backend(status: Option<&str>) -> Self {
        match status.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("stopped") | Some("exited") | Some("dead") => HoneypotStatus::Stopped,
            _ => HoneypotStatus::Running,
        }
    }
}

impl fmt::Display for HoneypotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoneypotStatus::Running => f.write_str("running"),
            HoneypotStatus::Stopped => f.write_str("stopped"),
        }
    }
}

/// One row of the dashboard, rebuilt on every poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunningHoneypot {
    /// Container id, else process id, else a positional placeholder
    pub identifier: String,
    /// `<service>-<port>`
    pub name: String,
    /// Raw service name as reported by the backend
    pub service_name: String,
    pub service_type: Option<ServiceType>,
    pub config: Value,
    pub runtime_kind: RuntimeKind,
    pub status: HoneypotStatus,
    pub port: Option<u16>,
    container_id: Option<String>,
    process_id: Option<String>,
}

impl RunningHoneypot {
    pub fn from_instance(index: usize, instance: &ServiceInstance) -> Self {
        let runtime_kind = match (&instance.container_id, &instance.process_id, instance.runtime.as_deref()) {
            (None, Some(_), _) | (None, None, Some("process")) => RuntimeKind::Process,
            _ => RuntimeKind::Container,
        };
        let identifier = instance
            .container_id
            .clone()
            .or_else(|| instance.process_id.clone())
            .unwrap_or_else(|| format!("service-{}", index));
        let port = instance.port();
        let name = match port {
            Some(port) => format!("{}-{}", instance.name, port),
            None => format!("{}-unknown", instance.name),
        };

        Self {
            identifier,
            name,
            service_name: instance.name.clone(),
            service_type: instance.name.parse().ok(),
            config: instance.config.clone(),
            runtime_kind,
            status: HoneypotStatus::from_backend(instance.status.as_deref()),
            port,
            container_id: instance.container_id.clone(),
            process_id: instance.process_id.clone(),
        }
    }

    /// Stop body for this instance, `None` when the backend gave no id
    pub fn stop_request(&self) -> Option<StopServiceRequest> {
        match self.runtime_kind {
            RuntimeKind::Container => self.container_id.clone().map(StopServiceRequest::container),
            RuntimeKind::Process => self.process_id.clone().map(StopServiceRequest::process),
        }
    }

    /// Container or process id known to the backend
    pub fn backend_id(&self) -> Option<&str> {
        self.container_id
            .as_deref()
            .or(self.process_id.as_deref())
    }

    pub fn is_running(&self) -> bool {
        self.status == HoneypotStatus::Running
    }

    /// Whether the backend serves auth/commands/messages logs for it
    pub fn has_real_logs(&self) -> bool {
        self.service_type.is_some_and(|t| t.has_real_logs())
    }
}
