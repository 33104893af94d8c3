//! Settings file management

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::DashboardError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Auto,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
            Theme::Auto => f.write_str("auto"),
        }
    }
}

/// Console settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,

    /// Refresh the dashboard and followed logs automatically
    #[serde(default = "default_true")]
    pub auto_refresh: bool,

    /// Dashboard refresh interval in seconds
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub network: NetworkSettings,

    #[serde(default)]
    pub advanced: AdvancedSettings,
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    5
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            auto_refresh: true,
            refresh_interval_secs: default_refresh_interval(),
            timezone: default_timezone(),
            notifications: NotificationSettings::default(),
            network: NetworkSettings::default(),
            advanced: AdvancedSettings::default(),
        }
    }
}

/// Which notifications reach the terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_true")]
    pub desktop: bool,

    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default = "default_true")]
    pub deployments: bool,

    #[serde(default = "default_true")]
    pub threats: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            desktop: true,
            sound: true,
            deployments: true,
            threats: true,
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    180
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedSettings {
    #[serde(default)]
    pub log_level: LogLevel,

    /// Structured log entries requested per fetch
    #[serde(default = "default_max_log_entries")]
    pub max_log_entries: u32,
}

fn default_max_log_entries() -> u32 {
    100
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            max_log_entries: default_max_log_entries(),
        }
    }
}

impl Settings {
    /// Set one value by dotted key, e.g. `network.api_url`
    ///
    /// The value is parsed as JSON first and falls back to a plain string,
    /// so `true`, `10` and `dark` all work. The result must still
    /// deserialize as [`Settings`].
    pub fn set(&mut self, key: &str, raw: &str) -> Result<(), DashboardError> {
        let mut document = serde_json::to_value(&*self)?;
        let pointer = format!("/{}", key.replace('.', "/"));
        let slot = document
            .pointer_mut(&pointer)
            .ok_or_else(|| DashboardError::NotFound(format!("Unknown setting: {}", key)))?;
        if slot.is_object() {
            return Err(DashboardError::ValidationError(format!(
                "{} is a section, set one of its fields instead",
                key
            )));
        }
        *slot = Value::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));

        *self = serde_json::from_value(document).map_err(|e| {
            DashboardError::ValidationError(format!("Invalid value for {}: {}", key, e))
        })?;
        Ok(())
    }

    /// Read one value by dotted key
    pub fn get(&self, key: &str) -> Result<Value, DashboardError> {
        let document = serde_json::to_value(self)?;
        let pointer = format!("/{}", key.replace('.', "/"));
        document
            .pointer(&pointer)
            .cloned()
            .ok_or_else(|| DashboardError::NotFound(format!("Unknown setting: {}", key)))
    }
}

/// Loads and persists [`Settings`] as a JSON file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    file: File,
}

impl SettingsStore {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    /// Read the settings file; a missing or unreadable file yields defaults
    pub async fn load(&self) -> Settings {
        if !self.file.exists().await {
            debug!("No settings file at {}, using defaults", self.file.path().display());
            return Settings::default();
        }
        match self.file.read_json::<Settings>().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load saved settings: {}", e);
                Settings::default()
            }
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), DashboardError> {
        self.file.write_json(settings).await?;
        info!("Settings saved to {}", self.file.path().display());
        Ok(())
    }

    /// Overwrite the file with defaults and return them
    pub async fn reset(&self) -> Result<Settings, DashboardError> {
        let settings = Settings::default();
        self.save(&settings).await?;
        Ok(settings)
    }

    /// Write the current settings, pretty printed, to `path`
    pub async fn export(&self, path: &Path) -> Result<(), DashboardError> {
        let settings = self.load().await;
        let contents = serde_json::to_string_pretty(&settings)?;
        File::new(path).write_string(&contents).await?;
        info!("Settings exported to {}", path.display());
        Ok(())
    }

    /// Replace the stored settings with the contents of `path`
    pub async fn import(&self, path: &Path) -> Result<Settings, DashboardError> {
        let settings = File::new(path)
            .read_json::<Settings>()
            .await
            .map_err(|e| DashboardError::ValidationError(format!("Invalid settings file: {}", e)))?;
        self.save(&settings).await?;
        Ok(settings)
    }
}

/// Default export file name, `honeydash-settings-<date>.json`
pub fn export_file_name(date: &str) -> String {
    format!("honeydash-settings-{}.json", date)
}
