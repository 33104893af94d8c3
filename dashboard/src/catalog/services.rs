//! Service descriptors

use serde::Serialize;

use crate::catalog::service_type::ServiceType;
use crate::utils::contains_ignore_case;

/// Descriptive metadata for one deployable honeypot type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub id: &'static str,
    pub service_type: ServiceType,
    pub name: &'static str,
    pub description: &'static str,
    pub default_port: u16,
    pub security: &'static str,
    pub monitoring: &'static str,
    pub attack_types: &'static str,
}

static CATALOG: [ServiceDescriptor; 10] = [
    ServiceDescriptor {
        id: "ssh",
        service_type: ServiceType::Ssh,
        name: "SSH Server",
        description: "Secure Shell honeypot for capturing login attempts and commands",
        default_port: 2222,
        security: "Password & Key Auth",
        monitoring: "Command Logging",
        attack_types: "Brute Force, Credential Harvesting",
    },
    ServiceDescriptor {
        id: "http",
        service_type: ServiceType::Http,
        name: "HTTP Server",
        description: "Web server honeypot for detecting web-based attacks",
        default_port: 8080,
        security: "Form Authentication",
        monitoring: "Request Logging",
        attack_types: "SQL Injection, XSS, Directory Traversal",
    },
    ServiceDescriptor {
        id: "ftp",
        service_type: ServiceType::Ftp,
        name: "FTP Server",
        description: "File Transfer Protocol honeypot for file access monitoring",
        default_port: 2121,
        security: "Anonymous & Auth",
        monitoring: "File Operations",
        attack_types: "File Upload, Directory Listing",
    },
    ServiceDescriptor {
        id: "telnet",
        service_type: ServiceType::Telnet,
        name: "Telnet Server",
        description: "Legacy terminal access honeypot",
        default_port: 2323,
        security: "Basic Authentication",
        monitoring: "Session Recording",
        attack_types: "Legacy System Exploitation",
    },
    ServiceDescriptor {
        id: "rdp",
        service_type: ServiceType::Rdp,
        name: "RDP Server",
        description: "Remote Desktop Protocol honeypot for Windows attacks",
        default_port: 3389,
        security: "Windows Auth",
        monitoring: "Desktop Sessions",
        attack_types: "Remote Access, Credential Theft",
    },
    ServiceDescriptor {
        id: "mysql",
        service_type: ServiceType::Mysql,
        name: "MySQL Database",
        description: "Database honeypot for SQL injection and data theft detection",
        default_port: 3306,
        security: "Database Auth",
        monitoring: "Query Logging",
        attack_types: "SQL Injection, Data Exfiltration",
    },
    ServiceDescriptor {
        id: "postgres",
        service_type: ServiceType::Postgres,
        name: "PostgreSQL Database",
        description: "PostgreSQL honeypot exposing a password-protected database",
        default_port: 5432,
        security: "Database Auth",
        monitoring: "Connection Logging",
        attack_types: "Credential Stuffing, Data Exfiltration",
    },
    ServiceDescriptor {
        id: "redis",
        service_type: ServiceType::Redis,
        name: "Redis Cache",
        description: "In-memory store honeypot for unauthenticated access attempts",
        default_port: 6379,
        security: "Optional Password",
        monitoring: "Command Logging",
        attack_types: "Unauthorized Access, Remote Code Execution",
    },
    ServiceDescriptor {
        id: "phpmyadmin",
        service_type: ServiceType::PhpMyAdmin,
        name: "phpMyAdmin",
        description: "Database admin panel honeypot for web login attacks",
        default_port: 8081,
        security: "Web Login",
        monitoring: "Request Logging",
        attack_types: "Brute Force, Admin Panel Discovery",
    },
    ServiceDescriptor {
        id: "api",
        service_type: ServiceType::Api,
        name: "REST API",
        description: "Fake REST API exposing bait keys and admin endpoints",
        default_port: 8080,
        security: "Basic Auth & API Key",
        monitoring: "Request Logging",
        attack_types: "Credential Theft, Endpoint Enumeration",
    },
];

/// All catalog entries in display order
pub fn catalog() -> &'static [ServiceDescriptor] {
    &CATALOG
}

/// Descriptor for a service type
pub fn descriptor(service_type: ServiceType) -> &'static ServiceDescriptor {
    CATALOG
        .iter()
        .find(|d| d.service_type == service_type)
        .unwrap_or(&CATALOG[0])
}

/// Catalog entries whose name or description contains `term`
pub fn search(term: &str) -> Vec<&'static ServiceDescriptor> {
    CATALOG
        .iter()
        .filter(|d| contains_ignore_case(d.name, term) || contains_ignore_case(d.description, term))
        .collect()
}
