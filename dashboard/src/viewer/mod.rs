//! Logs viewer

pub mod logs;
pub mod stats;

pub use logs::{entry_message, LogSource, LogsState, LogsViewer};
pub use stats::LogStats;
