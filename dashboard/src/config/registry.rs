//! Per-type registry: defaults, field schema and validation

use serde::Serialize;

use crate::catalog::ServiceType;
use crate::config::honeypot::{HoneypotConfig, ServiceSettings};

/// Kind of input a field takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Port,
    Text,
    Secret,
    Integer,
    Toggle,
    /// Three octal digits, edited through permission toggles
    FileMode,
    /// Comma separated list of strings
    TextList,
    /// Indexed sub-list edited through [`crate::config::RecordList`]
    Records,
}

/// One editable field of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub help: &'static str,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        required,
        help: "",
    }
}

const fn hinted(
    key: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
    help: &'static str,
) -> FieldSpec {
    FieldSpec {
        key,
        label,
        kind,
        required,
        help,
    }
}

const COMMON_FIELDS: [FieldSpec; 2] = [
    field("name", "Honeypot Name", FieldKind::Text, true),
    hinted("port", "Port", FieldKind::Port, true, "1-65535"),
];

const SSH_FIELDS: [FieldSpec; 6] = [
    field("banner", "SSH Banner", FieldKind::Text, false),
    hinted("users", "Users", FieldKind::Records, true, "at least one user is required"),
    hinted("passwd_chmod", "/etc/passwd Permissions", FieldKind::FileMode, true, "e.g. 644"),
    hinted("shadow_chmod", "/etc/shadow Permissions", FieldKind::FileMode, true, "e.g. 640"),
    field("max_auth_attempts", "Max Auth Attempts", FieldKind::Integer, false),
    field("allow_root_login", "Allow Root Login", FieldKind::Toggle, false),
];

const MYSQL_FIELDS: [FieldSpec; 7] = [
    field("root_password", "Root Password", FieldKind::Secret, true),
    field("user", "Database User", FieldKind::Text, false),
    field("user_password", "User Password", FieldKind::Secret, false),
    field("version", "MySQL Version", FieldKind::Text, false),
    field("databases", "Databases", FieldKind::TextList, false),
    hinted("init_sql", "Init SQL", FieldKind::Text, false, "executed when the decoy starts"),
    field("allow_remote_root", "Allow Remote Root", FieldKind::Toggle, false),
];

const POSTGRES_FIELDS: [FieldSpec; 1] = [field("password", "Password", FieldKind::Secret, true)];

const REDIS_FIELDS: [FieldSpec; 1] = [hinted(
    "password",
    "Password",
    FieldKind::Secret,
    false,
    "leave empty for unauthenticated access",
)];

const FTP_FIELDS: [FieldSpec; 12] = [
    field("username", "FTP Username", FieldKind::Text, true),
    field("ftp_password", "FTP Password", FieldKind::Secret, true),
    field("banner", "FTP Banner", FieldKind::Text, false),
    field("allow_anonymous", "Allow Anonymous", FieldKind::Toggle, false),
    field("max_connections", "Max Connections", FieldKind::Integer, false),
    hinted("session_timeout", "Session Timeout", FieldKind::Integer, false, "seconds"),
    field("passive_mode", "Passive Mode", FieldKind::Toggle, false),
    hinted("passive_port_range", "Passive Port Range", FieldKind::Text, false, "e.g. 50000-51000"),
    field("enable_logging", "Enable Logging", FieldKind::Toggle, false),
    hinted("user_accounts", "User Accounts", FieldKind::Records, true, "at least one account is required"),
    field("virtual_directories", "Virtual Directories", FieldKind::Records, false),
    field("file_list", "File Listings", FieldKind::Records, false),
];

const API_FIELDS: [FieldSpec; 4] = [
    field("username", "Username", FieldKind::Text, true),
    field("password", "Password", FieldKind::Secret, true),
    hinted("api_key", "API Key", FieldKind::Text, false, "bait key exposed by the fake API"),
    field("admin_email", "Admin Email", FieldKind::Text, false),
];

const HTTP_FIELDS: [FieldSpec; 5] = [
    hinted("server_name", "Server Header", FieldKind::Text, false, "e.g. Apache/2.4.41"),
    field("document_root", "Document Root", FieldKind::Text, false),
    field("enable_ssl", "Enable SSL", FieldKind::Toggle, false),
    field("enable_indexes", "Directory Indexes", FieldKind::Toggle, false),
    field("error_pages", "Custom Error Pages", FieldKind::Toggle, false),
];

const TELNET_FIELDS: [FieldSpec; 4] = [
    field("banner", "Telnet Banner", FieldKind::Text, false),
    field("username", "Username", FieldKind::Text, true),
    field("password", "Password", FieldKind::Secret, true),
    hinted("session_timeout", "Session Timeout", FieldKind::Integer, false, "seconds"),
];

const RDP_FIELDS: [FieldSpec; 4] = [
    field("computer_name", "Computer Name", FieldKind::Text, false),
    hinted("enable_nla", "Network Level Authentication", FieldKind::Toggle, false, "NLA"),
    hinted("security_layer", "Security Layer", FieldKind::Text, false, "rdp, tls or negotiate"),
    hinted("encryption", "Encryption Level", FieldKind::Text, false, "low, medium or high"),
];

fn type_fields(service_type: Option<ServiceType>) -> &'static [FieldSpec] {
    match service_type {
        Some(ServiceType::Ssh) => &SSH_FIELDS,
        Some(ServiceType::Mysql) => &MYSQL_FIELDS,
        Some(ServiceType::Postgres) => &POSTGRES_FIELDS,
        Some(ServiceType::Redis) => &REDIS_FIELDS,
        Some(ServiceType::Ftp) => &FTP_FIELDS,
        Some(ServiceType::Api) => &API_FIELDS,
        Some(ServiceType::Http) => &HTTP_FIELDS,
        Some(ServiceType::Telnet) => &TELNET_FIELDS,
        Some(ServiceType::Rdp) => &RDP_FIELDS,
        Some(ServiceType::PhpMyAdmin) | None => &[],
    }
}

/// Fields rendered for a type name; unknown names get the common fields only
pub fn field_schema(type_name: &str) -> Vec<FieldSpec> {
    let service_type = type_name.parse::<ServiceType>().ok();
    COMMON_FIELDS
        .iter()
        .chain(type_fields(service_type))
        .cloned()
        .collect()
}

/// Fresh config for a type name
pub fn default_config(type_name: &str) -> HoneypotConfig {
    HoneypotConfig::for_type_name(type_name)
}

/// Why a config cannot be submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Schema key of the offending field
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A config that passed validation, with its port narrowed
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub config: HoneypotConfig,
    pub port: u16,
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Check a config before it is submitted to the backend
pub fn validate(config: &HoneypotConfig) -> Result<ValidatedConfig, ValidationIssue> {
    let port = match config.port {
        None => return Err(ValidationIssue::new("port", "Please enter a port number")),
        Some(p) if !(1..=65535).contains(&p) => {
            return Err(ValidationIssue::new(
                "port",
                format!("Port must be between 1 and 65535 (got {})", p),
            ))
        }
        Some(p) => p as u16,
    };

    if blank(&config.name) {
        return Err(ValidationIssue::new("name", "Please enter a honeypot name"));
    }

    match &config.settings {
        ServiceSettings::Ssh(ssh) => {
            if ssh.users.is_empty() {
                return Err(ValidationIssue::new("users", "At least one SSH user is required"));
            }
            if ssh.users.iter().any(|u| blank(&u.username) || blank(&u.password)) {
                return Err(ValidationIssue::new(
                    "users",
                    "Please fill in all username and password fields for SSH users",
                ));
            }
        }
        ServiceSettings::Ftp(ftp) => {
            if blank(&ftp.username) || blank(&ftp.ftp_password) {
                return Err(ValidationIssue::new(
                    "username",
                    "Please enter an FTP username and password",
                ));
            }
            if ftp.user_accounts.iter().any(|a| blank(&a.username)) {
                return Err(ValidationIssue::new(
                    "user_accounts",
                    "Every FTP user account needs a username",
                ));
            }
        }
        ServiceSettings::Mysql(mysql) => {
            if blank(&mysql.root_password) {
                return Err(ValidationIssue::new(
                    "root_password",
                    "Please enter a MySQL root password",
                ));
            }
        }
        ServiceSettings::Postgres(pg) => {
            if blank(&pg.password) {
                return Err(ValidationIssue::new("password", "Please enter a PostgreSQL password"));
            }
        }
        ServiceSettings::Api(api) => {
            if blank(&api.username) || blank(&api.password) {
                return Err(ValidationIssue::new(
                    "username",
                    "Please enter an API username and password",
                ));
            }
        }
        ServiceSettings::Telnet(telnet) => {
            if blank(&telnet.username) || blank(&telnet.password) {
                return Err(ValidationIssue::new(
                    "username",
                    "Please enter a Telnet username and password",
                ));
            }
        }
        ServiceSettings::Redis(_)
        | ServiceSettings::PhpMyAdmin
        | ServiceSettings::Http(_)
        | ServiceSettings::Rdp(_)
        | ServiceSettings::Generic { .. } => {}
    }

    Ok(ValidatedConfig {
        config: config.clone(),
        port,
    })
}
