//! Backend API models
//!
//! Serde types for the JSON contract of the honeypot orchestration backend.

pub mod models;
