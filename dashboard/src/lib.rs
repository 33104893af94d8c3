//! Honeydash Library
//!
//! Operator console for configuring, deploying and monitoring honeypot
//! decoy services through the honeypot backend API.

pub mod app;
pub mod catalog;
pub mod config;
pub mod dashboard;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod storage;
pub mod utils;
pub mod viewer;
pub mod workers;
