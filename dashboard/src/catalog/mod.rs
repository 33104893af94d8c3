//! Static catalog of deployable honeypot types

pub mod service_type;
pub mod services;

pub use service_type::ServiceType;
pub use services::{catalog, descriptor, search, ServiceDescriptor};
