//! View models

pub mod honeypot;
pub mod notification;

pub use honeypot::{HoneypotStatus, RunningHoneypot, RuntimeKind};
pub use notification::{Notification, NotificationKind};
