//! Honeypot service types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Protocol or category a decoy emulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Ssh,
    Mysql,
    Postgres,
    Redis,
    #[serde(rename = "phpmyadmin")]
    PhpMyAdmin,
    Ftp,
    Api,
    Rdp,
    Telnet,
    Http,
}

impl ServiceType {
    pub const ALL: [ServiceType; 10] = [
        ServiceType::Ssh,
        ServiceType::Mysql,
        ServiceType::Postgres,
        ServiceType::Redis,
        ServiceType::PhpMyAdmin,
        ServiceType::Ftp,
        ServiceType::Api,
        ServiceType::Rdp,
        ServiceType::Telnet,
        ServiceType::Http,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Ssh => "ssh",
            ServiceType::Mysql => "mysql",
            ServiceType::Postgres => "postgres",
            ServiceType::Redis => "redis",
            ServiceType::PhpMyAdmin => "phpmyadmin",
            ServiceType::Ftp => "ftp",
            ServiceType::Api => "api",
            ServiceType::Rdp => "rdp",
            ServiceType::Telnet => "telnet",
            ServiceType::Http => "http",
        }
    }

    /// Short upper-case label used in form titles, e.g. `SSH`
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Ssh => "SSH",
            ServiceType::Mysql => "MySQL",
            ServiceType::Postgres => "PostgreSQL",
            ServiceType::Redis => "Redis",
            ServiceType::PhpMyAdmin => "phpMyAdmin",
            ServiceType::Ftp => "FTP",
            ServiceType::Api => "API",
            ServiceType::Rdp => "RDP",
            ServiceType::Telnet => "Telnet",
            ServiceType::Http => "HTTP",
        }
    }

    /// Whether the backend exposes parsed auth/commands/messages logs
    pub fn has_real_logs(&self) -> bool {
        matches!(self, ServiceType::Ssh | ServiceType::Api)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| format!("Unknown service type: {}", s))
    }
}
