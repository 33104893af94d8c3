//! Wire form of a honeypot config
//!
//! The backend dispatches on `name`, which carries the service type; the
//! operator-facing name travels as `display_name`.

use serde_json::{json, Map, Value};

use crate::config::honeypot::{HoneypotConfig, ServiceSettings};
use crate::errors::DashboardError;

/// JSON object sent as `config` in `POST /services/start`
pub fn to_transport(config: &HoneypotConfig) -> Result<Value, DashboardError> {
    let mut body = Map::new();
    body.insert("name".into(), json!(config.service_name()));
    body.insert("display_name".into(), json!(config.name));
    body.insert("port".into(), json!(config.port));
    if let Some(template) = &config.template {
        body.insert("template".into(), json!(template));
    }

    let settings = match &config.settings {
        ServiceSettings::Ssh(ssh) => json!({
            "banner": ssh.banner,
            // the backend expects the user list as an encoded string
            "users": serde_json::to_string(&ssh.users)?,
            "passwd_chmod": ssh.passwd_mode.to_octal(),
            "shadow_chmod": ssh.shadow_mode.to_octal(),
            "max_auth_attempts": ssh.max_auth_attempts,
            "allow_root_login": ssh.allow_root_login,
        }),
        ServiceSettings::Mysql(mysql) => json!({
            "root_password": mysql.root_password,
            "user": mysql.user,
            "user_password": mysql.user_password,
            "version": mysql.version,
            "databases": mysql.databases,
            "init_sql": mysql.init_sql,
            "allow_remote_root": mysql.allow_remote_root,
        }),
        ServiceSettings::Postgres(pg) => json!({ "password": pg.password }),
        ServiceSettings::Redis(redis) => json!({ "password": redis.password }),
        ServiceSettings::Ftp(ftp) => json!({
            "user": ftp.username,
            "password": ftp.ftp_password,
            "banner": ftp.banner,
            "allow_anonymous": ftp.allow_anonymous,
            "max_connections": ftp.max_connections,
            "session_timeout": ftp.session_timeout,
            "passive_mode": ftp.passive_mode,
            "passive_port_range": ftp.passive_port_range,
            "enable_logging": ftp.enable_logging,
            "user_accounts": ftp.user_accounts,
            "virtual_directories": ftp.virtual_directories,
            "file_list": ftp.file_list,
        }),
        ServiceSettings::Api(api) => json!({
            "username": api.username,
            "password": api.password,
            "api_key": api.api_key,
            "admin_email": api.admin_email,
        }),
        ServiceSettings::Http(http) => json!({
            "server_name": http.server_name,
            "document_root": http.document_root,
            "enable_ssl": http.enable_ssl,
            "enable_indexes": http.enable_indexes,
            "error_pages": http.error_pages,
        }),
        ServiceSettings::Telnet(telnet) => json!({
            "banner": telnet.banner,
            "username": telnet.username,
            "password": telnet.password,
            "session_timeout": telnet.session_timeout,
        }),
        ServiceSettings::Rdp(rdp) => json!({
            "computer_name": rdp.computer_name,
            "enable_nla": rdp.enable_nla,
            "security_layer": rdp.security_layer,
            "encryption": rdp.encryption,
        }),
        ServiceSettings::PhpMyAdmin | ServiceSettings::Generic { .. } => json!({}),
    };

    if let Value::Object(fields) = settings {
        body.extend(fields);
    }
    Ok(Value::Object(body))
}
