//! Terminal rendering of notifications

use colored::Colorize;

use crate::models::notification::{Notification, NotificationKind};

/// One-line terminal form, e.g. `✓ Honeypot Created: ...`
pub fn render(notification: &Notification) -> String {
    let (marker, title) = match notification.kind {
        NotificationKind::Success => ("✓".green(), notification.title.green().bold()),
        NotificationKind::Error => ("✗".red(), notification.title.red().bold()),
        NotificationKind::Warning => ("!".yellow(), notification.title.yellow().bold()),
        NotificationKind::Info => ("i".cyan(), notification.title.cyan().bold()),
    };
    let mut line = format!("{} {}: {}", marker, title, notification.message);
    if notification.is_prompt() {
        line.push_str(&format!(" {}", "[y/N]".dimmed()));
    }
    line
}

/// Print to stderr so stdout stays machine-readable
pub fn print(notification: &Notification) {
    eprintln!("{}", render(notification));
}
