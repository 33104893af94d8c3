//! Named configuration templates per service type

use serde::Serialize;

use crate::catalog::ServiceType;
use crate::config::honeypot::{
    FileListing, FtpAccount, FtpPermission, HoneypotConfig, ListingKind, ServiceSettings, SshUser,
    VirtualDirectory,
};
use crate::errors::DashboardError;

pub const CUSTOM: &str = "Custom";

/// A template offered for a service type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub name: &'static str,
    pub description: &'static str,
}

const fn template(name: &'static str, description: &'static str) -> Template {
    Template { name, description }
}

const SSH_TEMPLATES: [Template; 4] = [
    template("Basic SSH", "Standard OpenSSH server with a single admin account"),
    template("Hardened SSH", "Single auth attempt, root login exposed"),
    template("Vulnerable SSH", "Legacy protocol banner with weak credentials"),
    template(CUSTOM, "Create your own custom SSH setup"),
];

const FTP_TEMPLATES: [Template; 4] = [
    template("Anonymous FTP", "Public FTP server allowing anonymous access"),
    template("Secure FTP", "FTP with authentication and restricted access"),
    template("Vulnerable FTP", "Legacy FTP server with security weaknesses"),
    template(CUSTOM, "Create your own custom FTP setup"),
];

const MYSQL_TEMPLATES: [Template; 3] = [
    template("MySQL 5.7", "MySQL 5.7 on Ubuntu 18.04"),
    template("MySQL 8.0", "MySQL 8.0 with remote root enabled"),
    template(CUSTOM, "Create your own custom MySQL setup"),
];

const HTTP_TEMPLATES: [Template; 4] = [
    template("Apache Server", "Apache on Ubuntu with directory indexes"),
    template("Nginx Server", "Nginx on Ubuntu"),
    template("IIS Server", "Microsoft IIS 10"),
    template(CUSTOM, "Create your own custom HTTP setup"),
];

const TELNET_TEMPLATES: [Template; 3] = [
    template("Basic Telnet", "Plain telnet login"),
    template("Router Telnet", "Cisco router login prompt on port 23"),
    template(CUSTOM, "Create your own custom Telnet setup"),
];

const RDP_TEMPLATES: [Template; 3] = [
    template("Windows RDP", "Workstation with NLA disabled"),
    template("Server RDP", "Server with NLA and TLS"),
    template(CUSTOM, "Create your own custom RDP setup"),
];

const CUSTOM_ONLY: [Template; 1] = [template(CUSTOM, "Start from the default configuration")];

/// Templates offered for a service type, "Custom" last
pub fn templates(service_type: ServiceType) -> &'static [Template] {
    match service_type {
        ServiceType::Ssh => &SSH_TEMPLATES,
        ServiceType::Ftp => &FTP_TEMPLATES,
        ServiceType::Mysql => &MYSQL_TEMPLATES,
        ServiceType::Http => &HTTP_TEMPLATES,
        ServiceType::Telnet => &TELNET_TEMPLATES,
        ServiceType::Rdp => &RDP_TEMPLATES,
        ServiceType::Postgres
        | ServiceType::Redis
        | ServiceType::PhpMyAdmin
        | ServiceType::Api => &CUSTOM_ONLY,
    }
}

/// Seed a config from a named template
///
/// The name becomes `"<template> <TYPE> Honeypot"`.
pub fn apply(service_type: ServiceType, template_name: &str) -> Result<HoneypotConfig, DashboardError> {
    let template = templates(service_type)
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(template_name.trim()))
        .ok_or_else(|| {
            DashboardError::NotFound(format!(
                "No template '{}' for {} honeypots",
                template_name,
                service_type.label()
            ))
        })?;

    let mut config = HoneypotConfig::defaults(service_type);
    config.name = format!("{} {} Honeypot", template.name, service_type.label());
    config.template = Some(template.name.to_string());
    seed(&mut config, template.name);
    Ok(config)
}

fn seed(config: &mut HoneypotConfig, template_name: &str) {
    match (&mut config.settings, template_name) {
        (ServiceSettings::Ssh(ssh), name) => {
            let (port, banner, user, password, attempts, root) = match name {
                "Hardened SSH" => (2222, "SSH-2.0-OpenSSH_8.0", "root", "toor", 1, true),
                "Vulnerable SSH" => (22, "SSH-1.99-OpenSSH_3.4", "admin", "admin", 10, true),
                "Basic SSH" => (2222, "SSH-2.0-OpenSSH_7.4", "admin", "password", 3, false),
                _ => return,
            };
            config.port = Some(port);
            ssh.banner = banner.to_string();
            ssh.users = vec![SshUser::new(user, password, true)];
            ssh.max_auth_attempts = attempts;
            ssh.allow_root_login = root;
        }
        (ServiceSettings::Ftp(ftp), "Anonymous FTP") => {
            ftp.banner =
                "220 Welcome to Anonymous FTP Server - Please login with USER anonymous".to_string();
            ftp.allow_anonymous = true;
            ftp.max_connections = 50;
            ftp.session_timeout = 300;
            ftp.passive_mode = true;
            ftp.passive_port_range = "50000-51000".to_string();
            ftp.enable_logging = true;
            ftp.user_accounts = vec![
                FtpAccount::new("anonymous", "", FtpPermission::Read, "/pub"),
                FtpAccount::new("ftp", "", FtpPermission::Read, "/pub"),
            ];
            ftp.virtual_directories = vec![
                VirtualDirectory::new("/pub", "Public files"),
                VirtualDirectory::new("/incoming", "Upload directory"),
            ];
            ftp.file_list = vec![
                FileListing::new("/pub/readme.txt", "1.2 KB", ListingKind::File),
                FileListing::new("/pub/software/", "-", ListingKind::Directory),
                FileListing::new("/incoming/", "-", ListingKind::Directory),
            ];
        }
        (ServiceSettings::Ftp(ftp), "Secure FTP") => {
            ftp.banner = "220 Secure FTP Server Ready - Authentication Required".to_string();
            ftp.allow_anonymous = false;
            ftp.max_connections = 10;
            ftp.session_timeout = 600;
            ftp.passive_mode = true;
            ftp.passive_port_range = "60000-61000".to_string();
            ftp.enable_logging = true;
            ftp.user_accounts = vec![
                FtpAccount::new("admin", "secure123", FtpPermission::Full, "/home/admin"),
                FtpAccount::new("user", "user123", FtpPermission::Read, "/home/user"),
            ];
            ftp.virtual_directories = vec![
                VirtualDirectory::new("/home/admin", "Administrator files"),
                VirtualDirectory::new("/home/user", "User directory"),
                VirtualDirectory::new("/shared", "Shared files"),
            ];
            ftp.file_list = vec![
                FileListing::new("/home/admin/config.ini", "0.8 KB", ListingKind::File),
                FileListing::new("/home/admin/logs/", "-", ListingKind::Directory),
                FileListing::new("/shared/documents/", "-", ListingKind::Directory),
            ];
        }
        (ServiceSettings::Ftp(ftp), "Vulnerable FTP") => {
            config.port = Some(21);
            ftp.banner = "220 ProFTPD 1.2.10 Server (ProFTPD Default Installation)".to_string();
            ftp.allow_anonymous = true;
            ftp.max_connections = 100;
            ftp.session_timeout = 120;
            ftp.passive_mode = false;
            ftp.passive_port_range = "1024-65535".to_string();
            ftp.enable_logging = false;
            ftp.user_accounts = vec![
                FtpAccount::new("anonymous", "", FtpPermission::Full, "/"),
                FtpAccount::new("admin", "admin", FtpPermission::Full, "/admin"),
                FtpAccount::new("test", "test", FtpPermission::Write, "/test"),
                FtpAccount::new("guest", "guest", FtpPermission::Read, "/guest"),
            ];
            ftp.virtual_directories = vec![
                VirtualDirectory::new("/", "Root directory"),
                VirtualDirectory::new("/admin", "Admin files"),
                VirtualDirectory::new("/backup", "Backup files"),
                VirtualDirectory::new("/temp", "Temporary files"),
            ];
            ftp.file_list = vec![
                FileListing::new("/etc/passwd", "2.1 KB", ListingKind::File),
                FileListing::new("/backup/database.sql", "15.7 MB", ListingKind::File),
                FileListing::new("/admin/passwords.txt", "0.9 KB", ListingKind::File),
                FileListing::new("/temp/", "-", ListingKind::Directory),
            ];
        }
        (ServiceSettings::Mysql(mysql), "MySQL 5.7") => {
            mysql.version = "5.7.32-0ubuntu0.18.04.1".to_string();
            mysql.databases = ["information_schema", "mysql", "performance_schema", "sys", "test"]
                .map(String::from)
                .to_vec();
            mysql.root_password = "password".to_string();
            mysql.allow_remote_root = false;
        }
        (ServiceSettings::Mysql(mysql), "MySQL 8.0") => {
            mysql.version = "8.0.22-0ubuntu0.20.04.3".to_string();
            mysql.databases = ["information_schema", "mysql", "performance_schema", "sys"]
                .map(String::from)
                .to_vec();
            mysql.user = "admin".to_string();
            mysql.user_password = "admin".to_string();
            mysql.root_password = "admin".to_string();
            mysql.allow_remote_root = true;
        }
        (ServiceSettings::Http(http), name) => {
            let (server, root, indexes) = match name {
                "Apache Server" => ("Apache/2.4.41 (Ubuntu)", "/var/www/html", true),
                "Nginx Server" => ("nginx/1.18.0 (Ubuntu)", "/usr/share/nginx/html", false),
                "IIS Server" => ("Microsoft-IIS/10.0", "C:\\inetpub\\wwwroot", false),
                _ => return,
            };
            http.server_name = server.to_string();
            http.document_root = root.to_string();
            http.enable_indexes = indexes;
        }
        (ServiceSettings::Telnet(telnet), name) => {
            let (port, banner, user, timeout) = match name {
                "Basic Telnet" => (2323, "Welcome to Telnet Server", "admin", 300),
                "Router Telnet" => (23, "Cisco Router Login", "cisco", 600),
                _ => return,
            };
            config.port = Some(port);
            telnet.banner = banner.to_string();
            telnet.username = user.to_string();
            telnet.password = user.to_string();
            telnet.session_timeout = timeout;
        }
        (ServiceSettings::Rdp(rdp), name) => {
            let (computer, nla, layer, encryption) = match name {
                "Windows RDP" => ("WIN-HONEYPOT", false, "rdp", "low"),
                "Server RDP" => ("SRV-HONEYPOT", true, "tls", "high"),
                _ => return,
            };
            rdp.computer_name = computer.to_string();
            rdp.enable_nla = nla;
            rdp.security_layer = layer.to_string();
            rdp.encryption = encryption.to_string();
        }
        _ => {}
    }
}
