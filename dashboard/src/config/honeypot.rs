//! Honeypot configuration model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ServiceType;
use crate::config::permissions::FileMode;
use crate::utils::generate_api_key;

/// Editable configuration for one decoy service
///
/// `port` holds whatever the operator typed; it is range-checked only when
/// the config is validated for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct HoneypotConfig {
    /// Display name of the honeypot instance
    pub name: String,

    pub port: Option<i64>,

    /// Template the form was seeded from, if any
    pub template: Option<String>,

    pub settings: ServiceSettings,
}

impl HoneypotConfig {
    /// Defaults for a known service type
    pub fn defaults(service_type: ServiceType) -> Self {
        Self {
            name: format!("{} Honeypot", service_type.label()),
            port: Some(crate::catalog::descriptor(service_type).default_port as i64),
            template: None,
            settings: ServiceSettings::defaults(service_type),
        }
    }

    /// Defaults for any type name; unknown names get a bare `{port}` form
    pub fn for_type_name(type_name: &str) -> Self {
        match type_name.parse::<ServiceType>() {
            Ok(service_type) => Self::defaults(service_type),
            Err(_) => Self {
                name: type_name.to_string(),
                port: None,
                template: None,
                settings: ServiceSettings::Generic {
                    service: type_name.trim().to_lowercase(),
                },
            },
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.settings.service_type()
    }

    /// Service name as the backend expects it in `config.name`
    pub fn service_name(&self) -> &str {
        self.settings.type_name()
    }
}

/// Per-type settings, tagged by service type
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceSettings {
    Ssh(SshSettings),
    Mysql(MysqlSettings),
    Postgres(PostgresSettings),
    Redis(RedisSettings),
    PhpMyAdmin,
    Ftp(FtpSettings),
    Api(ApiSettings),
    Rdp(RdpSettings),
    Telnet(TelnetSettings),
    Http(HttpSettings),
    Generic { service: String },
}

impl ServiceSettings {
    pub fn defaults(service_type: ServiceType) -> Self {
        match service_type {
            ServiceType::Ssh => ServiceSettings::Ssh(SshSettings::default()),
            ServiceType::Mysql => ServiceSettings::Mysql(MysqlSettings::default()),
            ServiceType::Postgres => ServiceSettings::Postgres(PostgresSettings::default()),
            ServiceType::Redis => ServiceSettings::Redis(RedisSettings::default()),
            ServiceType::PhpMyAdmin => ServiceSettings::PhpMyAdmin,
            ServiceType::Ftp => ServiceSettings::Ftp(FtpSettings::default()),
            ServiceType::Api => ServiceSettings::Api(ApiSettings::default()),
            ServiceType::Rdp => ServiceSettings::Rdp(RdpSettings::default()),
            ServiceType::Telnet => ServiceSettings::Telnet(TelnetSettings::default()),
            ServiceType::Http => ServiceSettings::Http(HttpSettings::default()),
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        match self {
            ServiceSettings::Ssh(_) => Some(ServiceType::Ssh),
            ServiceSettings::Mysql(_) => Some(ServiceType::Mysql),
            ServiceSettings::Postgres(_) => Some(ServiceType::Postgres),
            ServiceSettings::Redis(_) => Some(ServiceType::Redis),
            ServiceSettings::PhpMyAdmin => Some(ServiceType::PhpMyAdmin),
            ServiceSettings::Ftp(_) => Some(ServiceType::Ftp),
            ServiceSettings::Api(_) => Some(ServiceType::Api),
            ServiceSettings::Rdp(_) => Some(ServiceType::Rdp),
            ServiceSettings::Telnet(_) => Some(ServiceType::Telnet),
            ServiceSettings::Http(_) => Some(ServiceType::Http),
            ServiceSettings::Generic { .. } => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ServiceSettings::Generic { service } => service,
            other => other.service_type().map(|t| t.as_str()).unwrap_or_default(),
        }
    }
}

// ================================== SSH ========================================= //

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshUser {
    pub username: String,
    pub password: String,
    pub sudo: bool,
}

impl SshUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>, sudo: bool) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            sudo,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SshSettings {
    pub banner: String,
    pub users: Vec<SshUser>,
    /// Mode applied to `/etc/passwd` inside the decoy
    pub passwd_mode: FileMode,
    /// Mode applied to `/etc/shadow` inside the decoy
    pub shadow_mode: FileMode,
    pub max_auth_attempts: u32,
    pub allow_root_login: bool,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            banner: "Welcome to the SSH honeypot server".to_string(),
            users: vec![SshUser::new("admin", "admin123", true)],
            passwd_mode: FileMode::parse_octal("644").unwrap_or_default(),
            shadow_mode: FileMode::parse_octal("640").unwrap_or_default(),
            max_auth_attempts: 3,
            allow_root_login: false,
        }
    }
}

// ================================= MySQL ======================================== //

#[derive(Debug, Clone, PartialEq)]
pub struct MysqlSettings {
    pub root_password: String,
    pub user: String,
    pub user_password: String,
    pub version: String,
    pub databases: Vec<String>,
    /// SQL executed once when the decoy database starts
    pub init_sql: Option<String>,
    pub allow_remote_root: bool,
}

impl Default for MysqlSettings {
    fn default() -> Self {
        Self {
            root_password: "root".to_string(),
            user: "testuser".to_string(),
            user_password: "testpass".to_string(),
            version: "5.7.32".to_string(),
            databases: vec![
                "information_schema".to_string(),
                "mysql".to_string(),
                "test".to_string(),
            ],
            init_sql: None,
            allow_remote_root: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostgresSettings {
    pub password: String,
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            password: "postgres".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedisSettings {
    /// Passed to `--requirepass` when set
    pub password: Option<String>,
}

// ================================== FTP ========================================= //

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FtpPermission {
    #[default]
    Read,
    Write,
    Full,
}

impl FtpPermission {
    pub fn as_str(&self) -> &'static str {
        match self {
            FtpPermission::Read => "read",
            FtpPermission::Write => "write",
            FtpPermission::Full => "full",
        }
    }
}

impl FromStr for FtpPermission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(FtpPermission::Read),
            "write" => Ok(FtpPermission::Write),
            "full" => Ok(FtpPermission::Full),
            _ => Err(format!("Invalid FTP permission: {} (expected read, write or full)", s)),
        }
    }
}

impl fmt::Display for FtpPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FtpAccount {
    pub username: String,
    pub password: String,
    pub permissions: FtpPermission,
    pub home_dir: String,
}

impl FtpAccount {
    pub fn new(username: &str, password: &str, permissions: FtpPermission, home_dir: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            permissions,
            home_dir: home_dir.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualDirectory {
    pub path: String,
    pub description: String,
}

impl VirtualDirectory {
    pub fn new(path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    #[default]
    File,
    Directory,
}

impl FromStr for ListingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(ListingKind::File),
            "directory" | "dir" => Ok(ListingKind::Directory),
            _ => Err(format!("Invalid listing type: {}", s)),
        }
    }
}

/// Bait entry shown in directory listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileListing {
    pub path: String,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: ListingKind,
}

impl FileListing {
    pub fn new(path: &str, size: &str, kind: ListingKind) -> Self {
        Self {
            path: path.to_string(),
            size: size.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FtpSettings {
    pub username: String,
    /// Sent to the backend as `password`
    pub ftp_password: String,
    pub banner: String,
    pub allow_anonymous: bool,
    pub max_connections: u32,
    /// Idle session timeout in seconds
    pub session_timeout: u32,
    pub passive_mode: bool,
    pub passive_port_range: String,
    pub enable_logging: bool,
    pub user_accounts: Vec<FtpAccount>,
    pub virtual_directories: Vec<VirtualDirectory>,
    pub file_list: Vec<FileListing>,
}

impl Default for FtpSettings {
    fn default() -> Self {
        Self {
            username: "ftpuser".to_string(),
            ftp_password: "ftp123".to_string(),
            banner: "220 FTP Server Ready".to_string(),
            allow_anonymous: true,
            max_connections: 25,
            session_timeout: 300,
            passive_mode: true,
            passive_port_range: "50000-51000".to_string(),
            enable_logging: true,
            user_accounts: vec![FtpAccount::new(
                "admin",
                "password",
                FtpPermission::Full,
                "/home/admin",
            )],
            virtual_directories: vec![VirtualDirectory::new(
                "/home/admin",
                "Administrator directory",
            )],
            file_list: Vec::new(),
        }
    }
}

// ============================ API / HTTP / Telnet / RDP ========================== //

#[derive(Debug, Clone, PartialEq)]
pub struct ApiSettings {
    pub username: String,
    pub password: String,
    /// Bait key exposed by the fake configuration endpoints
    pub api_key: String,
    pub admin_email: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            username: "james".to_string(),
            password: "james".to_string(),
            api_key: generate_api_key(),
            admin_email: "admin@honeypot.local".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    /// Value of the `Server` response header
    pub server_name: String,
    pub document_root: String,
    pub enable_ssl: bool,
    pub enable_indexes: bool,
    pub error_pages: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            server_name: "Apache/2.4.41".to_string(),
            document_root: "/var/www/html".to_string(),
            enable_ssl: false,
            enable_indexes: true,
            error_pages: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TelnetSettings {
    pub banner: String,
    pub username: String,
    pub password: String,
    pub session_timeout: u32,
}

impl Default for TelnetSettings {
    fn default() -> Self {
        Self {
            banner: "Telnet Server Ready".to_string(),
            username: "user".to_string(),
            password: "password".to_string(),
            session_timeout: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RdpSettings {
    pub computer_name: String,
    /// Network Level Authentication
    pub enable_nla: bool,
    pub security_layer: String,
    pub encryption: String,
}

impl Default for RdpSettings {
    fn default() -> Self {
        Self {
            computer_name: "HONEYPOT-PC".to_string(),
            enable_nla: false,
            security_layer: "rdp".to_string(),
            encryption: "medium".to_string(),
        }
    }
}
