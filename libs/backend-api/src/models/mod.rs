//! API models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A running service as reported by `GET /services`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceInstance {
    /// Service name, which the backend sets to the service type
    #[serde(default)]
    pub name: String,

    /// Runtime backing the instance: `docker` or `process`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub container_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub process_id: Option<String>,

    /// Configuration snapshot the instance was started with
    #[serde(default)]
    pub config: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ServiceInstance {
    /// Port from the config snapshot, accepting numbers or numeric strings
    pub fn port(&self) -> Option<u16> {
        match self.config.get("port")? {
            Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// `GET /services` returns either a wrapped or a bare list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServicesPayload {
    Wrapped { services: Vec<ServiceInstance> },
    Bare(Vec<ServiceInstance>),
}

impl ServicesPayload {
    pub fn into_services(self) -> Vec<ServiceInstance> {
        match self {
            ServicesPayload::Wrapped { services } => services,
            ServicesPayload::Bare(services) => services,
        }
    }
}

/// Body of `POST /services/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartServiceRequest {
    pub config: Value,
}

/// Body of `POST /services/stop`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopServiceRequest {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
}

impl StopServiceRequest {
    pub fn container(container_id: impl Into<String>) -> Self {
        Self {
            kind: "docker".to_string(),
            container_id: Some(container_id.into()),
            process_id: None,
        }
    }

    pub fn process(process_id: impl Into<String>) -> Self {
        Self {
            kind: "process".to_string(),
            container_id: None,
            process_id: Some(process_id.into()),
        }
    }
}

/// Raw text logs (`/logs` and `/reallogs`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Option<String>,

    #[serde(default)]
    pub error: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl LogsResponse {
    pub fn is_error(&self) -> bool {
        is_truthy(self.error.as_ref())
    }
}

/// Sub-type of the parsed ("real") log files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RealLogKind {
    #[default]
    Auth,
    Commands,
    Messages,
}

impl RealLogKind {
    pub const ALL: [RealLogKind; 3] = [RealLogKind::Auth, RealLogKind::Commands, RealLogKind::Messages];

    pub fn as_str(&self) -> &'static str {
        match self {
            RealLogKind::Auth => "auth",
            RealLogKind::Commands => "commands",
            RealLogKind::Messages => "messages",
        }
    }
}

impl fmt::Display for RealLogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RealLogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auth" => Ok(RealLogKind::Auth),
            "commands" => Ok(RealLogKind::Commands),
            "messages" => Ok(RealLogKind::Messages),
            _ => Err(format!("Invalid log type: {}", s)),
        }
    }
}

/// Structured logs with backend-computed statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredLogsResponse {
    #[serde(default)]
    pub logs: Vec<LogEntry>,

    #[serde(default)]
    pub statistics: BTreeMap<String, Value>,

    #[serde(default)]
    pub error: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl StructuredLogsResponse {
    pub fn is_error(&self) -> bool {
        is_truthy(self.error.as_ref())
    }
}

/// A backend-parsed log entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub timestamp: Option<String>,

    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub threat_level: Option<String>,

    /// Event type, e.g. `FAILED_LOGIN` or `API_REQUEST`
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,

    #[serde(default)]
    pub ip: Option<String>,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub details: Option<LogDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogDetails {
    #[serde(default)]
    pub raw_line: Option<String>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<Value>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Human readable message: a string `error` wins, then `message`
    pub fn message_text(&self) -> Option<String> {
        match &self.error {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => self.message.clone().filter(|m| !m.is_empty()),
        }
    }
}

/// The backend uses `error: false` / `error: true` / `error: "text"`
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
