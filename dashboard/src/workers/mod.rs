//! Background workers

pub mod log_refresh;
pub mod poller;
