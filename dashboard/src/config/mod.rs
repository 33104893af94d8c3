//! Honeypot configuration forms

pub mod form;
pub mod honeypot;
pub mod permissions;
pub mod registry;
pub mod templates;
pub mod transport;

pub use form::{ConfigForm, RecordList};
pub use honeypot::{HoneypotConfig, ServiceSettings};
pub use permissions::{FileMode, Permission, PermissionBit, Role};
pub use registry::{default_config, field_schema, validate, FieldKind, FieldSpec, ValidatedConfig, ValidationIssue};
pub use transport::to_transport;
