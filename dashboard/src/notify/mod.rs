//! Notifications and confirm prompts

pub mod center;
pub mod render;

pub use center::NotificationCenter;
