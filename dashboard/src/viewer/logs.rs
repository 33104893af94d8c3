//! Logs viewer for one running honeypot

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use backend_api::models::{LogEntry, RealLogKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{watch, RwLock};
use tracing::{debug, error, info};

use crate::errors::DashboardError;
use crate::filesys::file::File;
use crate::http::api::HoneypotApi;
use crate::http::logs::StructuredLogQuery;
use crate::models::honeypot::RunningHoneypot;
use crate::models::notification::Notification;
use crate::notify::center::NotificationCenter;
use crate::utils::{contains_ignore_case, today};
use crate::viewer::stats::LogStats;

/// Where log text comes from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    /// Raw container or process output
    #[default]
    Container,
    /// Parsed log files, sub-typed by [`RealLogKind`]
    Real,
    /// Parsed entries with statistics
    Structured,
}

impl LogSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogSource::Container => "container",
            LogSource::Real => "real",
            LogSource::Structured => "structured",
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "container" => Ok(LogSource::Container),
            "real" => Ok(LogSource::Real),
            "structured" => Ok(LogSource::Structured),
            _ => Err(format!("Invalid log source: {} (expected container, real or structured)", s)),
        }
    }
}

/// One-line description of a structured entry
pub fn entry_message(entry: &LogEntry) -> String {
    let ip = entry.ip.as_deref().unwrap_or("unknown");
    let user = entry.user.as_deref().unwrap_or("");
    match entry.event_type.as_deref() {
        Some("FAILED_LOGIN") => format!("Failed login attempt from {} for user \"{}\"", ip, user),
        Some("SUCCESSFUL_LOGIN") => format!("Successful login from {} for user \"{}\"", ip, user),
        Some("COMMAND_EXECUTED") => {
            format!("Command executed: {}", entry.command.as_deref().unwrap_or(""))
        }
        Some("API_REQUEST") => format!(
            "{} {} from {}",
            entry.method.as_deref().unwrap_or("GET"),
            entry.path.as_deref().unwrap_or("/"),
            ip
        ),
        _ => entry
            .details
            .as_ref()
            .and_then(|d| d.raw_line.clone())
            .unwrap_or_else(|| "Unknown log entry".to_string()),
    }
}

fn entry_line(entry: &LogEntry) -> String {
    format!(
        "{} [{}] [{}] {}",
        entry.timestamp.as_deref().unwrap_or("-"),
        entry.level.as_deref().unwrap_or("info").to_uppercase(),
        entry.threat_level.as_deref().unwrap_or("none"),
        entry_message(entry)
    )
}

/// Viewer state, replaced wholesale on every fetch
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogsState {
    pub target: Option<RunningHoneypot>,
    pub source: LogSource,
    pub kind: RealLogKind,
    /// Raw text for container and real sources
    pub text: String,
    pub entries: Vec<LogEntry>,
    pub statistics: BTreeMap<String, Value>,
    pub error: Option<String>,
    pub loading: bool,
    pub auto_refresh: bool,
    pub search: String,
    pub level_filter: Option<String>,
    pub threat_filter: Option<String>,
}

impl LogsState {
    /// Structured entries passing the level and threat filters
    pub fn filtered_entries(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| matches_filter(self.level_filter.as_deref(), e.level.as_deref()))
            .filter(|e| matches_filter(self.threat_filter.as_deref(), e.threat_level.as_deref()))
            .collect()
    }

    /// Text currently on screen, search applied
    pub fn displayed_text(&self) -> String {
        let lines: Vec<String> = match self.source {
            LogSource::Structured => self.filtered_entries().into_iter().map(entry_line).collect(),
            LogSource::Container | LogSource::Real => {
                self.text.lines().map(str::to_string).collect()
            }
        };
        lines
            .into_iter()
            .filter(|line| contains_ignore_case(line, &self.search))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Summary of the filtered structured entries as of `now`
    pub fn stats_at(&self, now: DateTime<Utc>) -> LogStats {
        LogStats::from_entries(&self.filtered_entries(), now)
    }

    pub fn stats(&self) -> LogStats {
        self.stats_at(Utc::now())
    }

    /// Log type used in download file names
    pub fn log_type(&self) -> &'static str {
        self.source.as_str()
    }
}

fn matches_filter(filter: Option<&str>, value: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(f) if f.eq_ignore_ascii_case("all") => true,
        Some(f) => value.is_some_and(|v| v.eq_ignore_ascii_case(f)),
    }
}

/// Fetches and filters logs for the selected honeypot
pub struct LogsViewer {
    api: Arc<dyn HoneypotApi>,
    notifications: Arc<NotificationCenter>,
    state: RwLock<LogsState>,
    structured_limit: u32,
    /// Bumped after every fetch
    revision: watch::Sender<u64>,
}

impl LogsViewer {
    pub fn new(api: Arc<dyn HoneypotApi>, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            api,
            notifications,
            state: RwLock::new(LogsState::default()),
            structured_limit: crate::http::logs::DEFAULT_STRUCTURED_LIMIT,
            revision: watch::Sender::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn with_structured_limit(mut self, limit: u32) -> Self {
        self.structured_limit = limit;
        self
    }

    pub async fn snapshot(&self) -> LogsState {
        self.state.read().await.clone()
    }

    /// Select a honeypot and fetch its logs
    pub async fn select(&self, target: RunningHoneypot) {
        self.state.write().await.target = Some(target);
        self.refresh().await;
    }

    pub async fn set_source(&self, source: LogSource) {
        self.state.write().await.source = source;
        self.refresh().await;
    }

    pub async fn set_kind(&self, kind: RealLogKind) {
        self.state.write().await.kind = kind;
        self.refresh().await;
    }

    pub async fn set_auto_refresh(&self, enabled: bool) {
        self.state.write().await.auto_refresh = enabled;
    }

    pub async fn auto_refresh(&self) -> bool {
        self.state.read().await.auto_refresh
    }

    pub async fn set_search(&self, term: &str) {
        self.state.write().await.search = term.to_string();
    }

    /// `None` or `"all"` disables the filter
    pub async fn set_level_filter(&self, level: Option<String>) {
        self.state.write().await.level_filter = level;
    }

    pub async fn set_threat_filter(&self, threat: Option<String>) {
        self.state.write().await.threat_filter = threat;
    }

    pub async fn displayed_text(&self) -> String {
        self.state.read().await.displayed_text()
    }

    /// Re-fetch for the current target, source and kind
    pub async fn refresh(&self) {
        self.fetch().await;
        self.revision.send_modify(|r| *r += 1);
    }

    async fn fetch(&self) {
        let (target, source, kind) = {
            let mut state = self.state.write().await;
            let Some(target) = state.target.clone() else {
                return;
            };
            state.loading = true;
            (target, state.source, state.kind)
        };

        let Some(id) = target.backend_id().map(str::to_string) else {
            let mut state = self.state.write().await;
            state.loading = false;
            state.text = "No container ID available for this honeypot".to_string();
            state.entries.clear();
            state.error = Some(state.text.clone());
            return;
        };

        debug!("Fetching {} logs for {}", source, id);
        match source {
            LogSource::Container => {
                let result = self.api.container_logs(&id).await;
                let (text, error) = raw_outcome(result, "container", "No container logs available");
                self.store_text(text, error).await;
            }
            LogSource::Real => {
                let result = self.api.real_logs(&id, kind).await;
                let empty = format!("No {} logs available yet", kind);
                let (text, error) = raw_outcome(result, kind.as_str(), &empty);
                self.store_text(text, error).await;
            }
            LogSource::Structured => {
                let query = StructuredLogQuery {
                    kind,
                    limit: self.structured_limit,
                };
                let result = self.api.structured_logs(&id, &query).await;
                let mut state = self.state.write().await;
                state.loading = false;
                state.text.clear();
                state.entries.clear();
                state.statistics.clear();
                match result {
                    Ok(data) if data.is_error() => {
                        state.error = Some(data.message.unwrap_or_else(|| "Failed to load logs".to_string()));
                    }
                    Ok(data) => {
                        state.entries = data.logs;
                        state.statistics = data.statistics;
                        state.error = None;
                    }
                    Err(e) => {
                        error!("Failed to fetch structured logs: {}", e);
                        state.error = Some(e.to_string());
                    }
                }
            }
        }
    }

    async fn store_text(&self, text: String, error: Option<String>) {
        let mut state = self.state.write().await;
        state.loading = false;
        state.text = text;
        state.entries.clear();
        state.statistics.clear();
        state.error = error;
    }

    /// Write the displayed text to `<name>_<type>_logs_<date>.txt` in `dir`
    ///
    /// Returns `None` when there was nothing to write.
    pub async fn download(&self, dir: &Path) -> Result<Option<PathBuf>, DashboardError> {
        let (text, name, log_type) = {
            let state = self.state.read().await;
            let name = state
                .target
                .as_ref()
                .map(|t| t.name.clone())
                .unwrap_or_else(|| "honeypot".to_string());
            (state.displayed_text(), name, state.log_type())
        };

        if text.trim().is_empty() {
            self.notifications.show(Notification::warning(
                "No Logs to Download",
                "There are no logs available to download.",
            ));
            return Ok(None);
        }

        let file = File::new(dir.join(download_file_name(&name, log_type, &today())));
        if let Err(e) = file.write_string(&text).await {
            error!("Failed to download logs: {}", e);
            self.notifications.show(Notification::error(
                "Download Failed",
                "Failed to download logs. Please try again.",
            ));
            return Err(e);
        }

        info!("Logs written to {}", file.path().display());
        self.notifications.show(Notification::success(
            "Logs Downloaded",
            format!("Logs have been saved to {}", file.path().display()),
        ));
        Ok(Some(file.path().to_path_buf()))
    }
}

/// `<service name>_<log type>_logs_<YYYY-MM-DD>.txt`
pub fn download_file_name(name: &str, log_type: &str, date: &str) -> String {
    format!("{}_{}_logs_{}.txt", name, log_type, date)
}

fn raw_outcome(
    result: Result<backend_api::models::LogsResponse, DashboardError>,
    label: &str,
    empty: &str,
) -> (String, Option<String>) {
    match result {
        Ok(data) if data.is_error() => {
            let text = format!(
                "Failed to load {} logs: {}",
                label,
                data.message.unwrap_or_default()
            );
            (text.clone(), Some(text))
        }
        Ok(data) => {
            let text = data
                .logs
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| empty.to_string());
            (text, None)
        }
        Err(e) => {
            error!("Failed to fetch {} logs: {}", label, e);
            let text = format!("Error loading {} logs: {}", label, e);
            (text.clone(), Some(text))
        }
    }
}
