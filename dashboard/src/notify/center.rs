//! Single-slot notification center

use tokio::sync::watch;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::notification::{Notification, NotificationKind};

/// Holds the one notification currently on screen
///
/// Showing a new notification supersedes the previous one.
#[derive(Debug)]
pub struct NotificationCenter {
    current: watch::Sender<Option<Notification>>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self {
            current: watch::Sender::new(None),
        }
    }

    pub fn show(&self, notification: Notification) -> Uuid {
        match notification.kind {
            NotificationKind::Error => error!("{}: {}", notification.title, notification.message),
            NotificationKind::Warning => warn!("{}: {}", notification.title, notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                info!("{}: {}", notification.title, notification.message)
            }
        }
        let id = notification.id;
        self.current.send_replace(Some(notification));
        id
    }

    pub fn current(&self) -> Option<Notification> {
        self.current.borrow().clone()
    }

    pub fn dismiss(&self) {
        self.current.send_replace(None);
    }

    /// Dismiss only if `id` is still the one shown
    pub fn dismiss_id(&self, id: Uuid) -> bool {
        self.current.send_if_modified(|slot| match slot {
            Some(n) if n.id == id => {
                *slot = None;
                true
            }
            _ => false,
        })
    }

    /// Run the current prompt's confirm action and close it
    pub fn confirm(&self) -> bool {
        let Some(notification) = self.current.send_replace(None) else {
            return false;
        };
        notification.confirm()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.current.subscribe()
    }
}
