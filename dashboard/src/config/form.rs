//! Editable configuration form
//!
//! Edits only touch local state. Fields are addressed by their schema key so
//! the CLI and generic renderers share one code path.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::catalog::ServiceType;
use crate::config::honeypot::{
    FileListing, FtpAccount, FtpPermission, HoneypotConfig, ListingKind, ServiceSettings, SshUser,
    VirtualDirectory,
};
use crate::config::permissions::{FileMode, PermissionBit, Role};
use crate::config::registry::{self, FieldSpec, ValidatedConfig, ValidationIssue};
use crate::config::templates;
use crate::errors::DashboardError;

/// Indexed sub-lists of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordList {
    SshUsers,
    FtpAccounts,
    VirtualDirectories,
    FileListings,
}

impl RecordList {
    pub fn key(&self) -> &'static str {
        match self {
            RecordList::SshUsers => "users",
            RecordList::FtpAccounts => "user_accounts",
            RecordList::VirtualDirectories => "virtual_directories",
            RecordList::FileListings => "file_list",
        }
    }

    /// Entries that must always remain; credential lists keep one
    pub fn min_len(&self) -> usize {
        match self {
            RecordList::SshUsers | RecordList::FtpAccounts => 1,
            RecordList::VirtualDirectories | RecordList::FileListings => 0,
        }
    }
}

impl fmt::Display for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for RecordList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "users" => Ok(RecordList::SshUsers),
            "user_accounts" => Ok(RecordList::FtpAccounts),
            "virtual_directories" => Ok(RecordList::VirtualDirectories),
            "file_list" => Ok(RecordList::FileListings),
            other => Err(format!("Unknown list: {}", other)),
        }
    }
}

fn invalid(msg: impl Into<String>) -> DashboardError {
    DashboardError::ValidationError(msg.into())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DashboardError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(format!("{} expects true or false, got '{}'", key, value))),
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, DashboardError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(format!("{} expects a non-negative number, got '{}'", key, value)))
}

fn parse_mode(key: &str, value: &str) -> Result<FileMode, DashboardError> {
    FileMode::parse_octal(value).map_err(|e| invalid(format!("{}: {}", key, e)))
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn unknown_field(service: &str, key: &str) -> DashboardError {
    invalid(format!("Unknown field '{}' for {} honeypots", key, service))
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Form state for one honeypot being configured
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigForm {
    config: HoneypotConfig,
}

impl ConfigForm {
    /// Open a form with per-type defaults
    pub fn open(type_name: &str) -> Self {
        Self {
            config: registry::default_config(type_name),
        }
    }

    /// Open a form seeded from a named template
    pub fn from_template(service_type: ServiceType, template: &str) -> Result<Self, DashboardError> {
        Ok(Self {
            config: templates::apply(service_type, template)?,
        })
    }

    pub fn from_config(config: HoneypotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HoneypotConfig {
        &self.config
    }

    pub fn into_config(self) -> HoneypotConfig {
        self.config
    }

    pub fn schema(&self) -> Vec<FieldSpec> {
        registry::field_schema(self.config.service_name())
    }

    pub fn validate(&self) -> Result<ValidatedConfig, ValidationIssue> {
        registry::validate(&self.config)
    }

    /// Set a scalar field from its text form
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), DashboardError> {
        debug!("set_field {}", key);
        match key {
            "name" => {
                self.config.name = value.to_string();
                return Ok(());
            }
            "port" => {
                let trimmed = value.trim();
                self.config.port = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.parse().map_err(|_| {
                        invalid(format!("port expects a number, got '{}'", value))
                    })?)
                };
                return Ok(());
            }
            _ => {}
        }

        let service = self.config.service_name().to_string();
        let unknown = || unknown_field(&service, key);
        match &mut self.config.settings {
            ServiceSettings::Ssh(ssh) => match key {
                "banner" => ssh.banner = value.to_string(),
                "passwd_chmod" => ssh.passwd_mode = parse_mode(key, value)?,
                "shadow_chmod" => ssh.shadow_mode = parse_mode(key, value)?,
                "max_auth_attempts" => ssh.max_auth_attempts = parse_u32(key, value)?,
                "allow_root_login" => ssh.allow_root_login = parse_bool(key, value)?,
                _ => return Err(unknown()),
            },
            ServiceSettings::Mysql(mysql) => match key {
                "root_password" => mysql.root_password = value.to_string(),
                "user" => mysql.user = value.to_string(),
                "user_password" => mysql.user_password = value.to_string(),
                "version" => mysql.version = value.to_string(),
                "databases" => mysql.databases = parse_list(value),
                "init_sql" => mysql.init_sql = optional(value),
                "allow_remote_root" => mysql.allow_remote_root = parse_bool(key, value)?,
                _ => return Err(unknown()),
            },
            ServiceSettings::Postgres(pg) => match key {
                "password" => pg.password = value.to_string(),
                _ => return Err(unknown()),
            },
            ServiceSettings::Redis(redis) => match key {
                "password" => redis.password = optional(value),
                _ => return Err(unknown()),
            },
            ServiceSettings::Ftp(ftp) => match key {
                "username" => ftp.username = value.to_string(),
                "ftp_password" | "password" => ftp.ftp_password = value.to_string(),
                "banner" => ftp.banner = value.to_string(),
                "allow_anonymous" => ftp.allow_anonymous = parse_bool(key, value)?,
                "max_connections" => ftp.max_connections = parse_u32(key, value)?,
                "session_timeout" => ftp.session_timeout = parse_u32(key, value)?,
                "passive_mode" => ftp.passive_mode = parse_bool(key, value)?,
                "passive_port_range" => ftp.passive_port_range = value.to_string(),
                "enable_logging" => ftp.enable_logging = parse_bool(key, value)?,
                _ => return Err(unknown()),
            },
            ServiceSettings::Api(api) => match key {
                "username" => api.username = value.to_string(),
                "password" => api.password = value.to_string(),
                "api_key" => api.api_key = value.to_string(),
                "admin_email" => api.admin_email = value.to_string(),
                _ => return Err(unknown()),
            },
            ServiceSettings::Http(http) => match key {
                "server_name" => http.server_name = value.to_string(),
                "document_root" => http.document_root = value.to_string(),
                "enable_ssl" => http.enable_ssl = parse_bool(key, value)?,
                "enable_indexes" => http.enable_indexes = parse_bool(key, value)?,
                "error_pages" => http.error_pages = parse_bool(key, value)?,
                _ => return Err(unknown()),
            },
            ServiceSettings::Telnet(telnet) => match key {
                "banner" => telnet.banner = value.to_string(),
                "username" => telnet.username = value.to_string(),
                "password" => telnet.password = value.to_string(),
                "session_timeout" => telnet.session_timeout = parse_u32(key, value)?,
                _ => return Err(unknown()),
            },
            ServiceSettings::Rdp(rdp) => match key {
                "computer_name" => rdp.computer_name = value.to_string(),
                "enable_nla" => rdp.enable_nla = parse_bool(key, value)?,
                "security_layer" => rdp.security_layer = value.to_string(),
                "encryption" => rdp.encryption = value.to_string(),
                _ => return Err(unknown()),
            },
            ServiceSettings::PhpMyAdmin | ServiceSettings::Generic { .. } => {
                return Err(unknown())
            }
        }
        Ok(())
    }

    fn unknown_field(&self, key: &str) -> DashboardError {
        unknown_field(self.config.service_name(), key)
    }

    /// Toggle one permission bit of `passwd_chmod` or `shadow_chmod`
    pub fn set_permission(
        &mut self,
        key: &str,
        role: Role,
        bit: PermissionBit,
        on: bool,
    ) -> Result<(), DashboardError> {
        let service = self.config.service_name().to_string();
        let ServiceSettings::Ssh(ssh) = &mut self.config.settings else {
            return Err(unknown_field(&service, key));
        };
        match key {
            "passwd_chmod" => ssh.passwd_mode.set(role, bit, on),
            "shadow_chmod" => ssh.shadow_mode.set(role, bit, on),
            _ => return Err(unknown_field(&service, key)),
        }
        Ok(())
    }

    /// Number of entries in a sub-list, `None` when the form has no such list
    pub fn len(&self, list: RecordList) -> Option<usize> {
        match (&self.config.settings, list) {
            (ServiceSettings::Ssh(ssh), RecordList::SshUsers) => Some(ssh.users.len()),
            (ServiceSettings::Ftp(ftp), RecordList::FtpAccounts) => Some(ftp.user_accounts.len()),
            (ServiceSettings::Ftp(ftp), RecordList::VirtualDirectories) => {
                Some(ftp.virtual_directories.len())
            }
            (ServiceSettings::Ftp(ftp), RecordList::FileListings) => Some(ftp.file_list.len()),
            _ => None,
        }
    }

    /// Append a blank entry and return its index
    pub fn add(&mut self, list: RecordList) -> Result<usize, DashboardError> {
        let unsupported = self.unknown_field(list.key());
        let len = match (&mut self.config.settings, list) {
            (ServiceSettings::Ssh(ssh), RecordList::SshUsers) => {
                ssh.users.push(SshUser::new("", "", false));
                ssh.users.len()
            }
            (ServiceSettings::Ftp(ftp), RecordList::FtpAccounts) => {
                ftp.user_accounts
                    .push(FtpAccount::new("", "", FtpPermission::Read, "/"));
                ftp.user_accounts.len()
            }
            (ServiceSettings::Ftp(ftp), RecordList::VirtualDirectories) => {
                ftp.virtual_directories.push(VirtualDirectory::new("", ""));
                ftp.virtual_directories.len()
            }
            (ServiceSettings::Ftp(ftp), RecordList::FileListings) => {
                ftp.file_list.push(FileListing::new("", "", ListingKind::File));
                ftp.file_list.len()
            }
            _ => return Err(unsupported),
        };
        Ok(len - 1)
    }

    /// Set one field of the entry at `index`
    pub fn update(
        &mut self,
        list: RecordList,
        index: usize,
        key: &str,
        value: &str,
    ) -> Result<(), DashboardError> {
        let len = self.len(list).ok_or_else(|| self.unknown_field(list.key()))?;
        if index >= len {
            return Err(invalid(format!(
                "{} has no entry at index {} (length {})",
                list, index, len
            )));
        }
        let bad_key = || invalid(format!("Unknown field '{}' in {}", key, list));

        match (&mut self.config.settings, list) {
            (ServiceSettings::Ssh(ssh), RecordList::SshUsers) => {
                let user = &mut ssh.users[index];
                match key {
                    "username" => user.username = value.to_string(),
                    "password" => user.password = value.to_string(),
                    "sudo" => user.sudo = parse_bool(key, value)?,
                    _ => return Err(bad_key()),
                }
            }
            (ServiceSettings::Ftp(ftp), RecordList::FtpAccounts) => {
                let account = &mut ftp.user_accounts[index];
                match key {
                    "username" => account.username = value.to_string(),
                    "password" => account.password = value.to_string(),
                    "permissions" => account.permissions = value.parse::<FtpPermission>().map_err(invalid)?,
                    "home_dir" => account.home_dir = value.to_string(),
                    _ => return Err(bad_key()),
                }
            }
            (ServiceSettings::Ftp(ftp), RecordList::VirtualDirectories) => {
                let dir = &mut ftp.virtual_directories[index];
                match key {
                    "path" => dir.path = value.to_string(),
                    "description" => dir.description = value.to_string(),
                    _ => return Err(bad_key()),
                }
            }
            (ServiceSettings::Ftp(ftp), RecordList::FileListings) => {
                let listing = &mut ftp.file_list[index];
                match key {
                    "path" => listing.path = value.to_string(),
                    "size" => listing.size = value.to_string(),
                    "type" | "kind" => listing.kind = value.parse::<ListingKind>().map_err(invalid)?,
                    _ => return Err(bad_key()),
                }
            }
            _ => return Err(bad_key()),
        }
        Ok(())
    }

    /// Whether the remove control for this list is enabled
    pub fn can_remove(&self, list: RecordList) -> bool {
        self.len(list).is_some_and(|len| len > list.min_len())
    }

    /// Remove the entry at `index`; refused when the list is at its minimum
    pub fn remove(&mut self, list: RecordList, index: usize) -> Result<(), DashboardError> {
        let len = self.len(list).ok_or_else(|| self.unknown_field(list.key()))?;
        if index >= len {
            return Err(invalid(format!(
                "{} has no entry at index {} (length {})",
                list, index, len
            )));
        }
        if !self.can_remove(list) {
            return Err(invalid(format!(
                "At least {} entry must remain in {}",
                list.min_len(),
                list
            )));
        }

        match (&mut self.config.settings, list) {
            (ServiceSettings::Ssh(ssh), RecordList::SshUsers) => {
                ssh.users.remove(index);
            }
            (ServiceSettings::Ftp(ftp), RecordList::FtpAccounts) => {
                ftp.user_accounts.remove(index);
            }
            (ServiceSettings::Ftp(ftp), RecordList::VirtualDirectories) => {
                ftp.virtual_directories.remove(index);
            }
            (ServiceSettings::Ftp(ftp), RecordList::FileListings) => {
                ftp.file_list.remove(index);
            }
            _ => {}
        }
        Ok(())
    }
}
