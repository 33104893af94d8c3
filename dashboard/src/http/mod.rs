//! Backend HTTP client

pub mod api;
pub mod client;
pub mod logs;
pub mod services;

pub use api::HoneypotApi;
pub use client::HttpClient;
pub use logs::StructuredLogQuery;
