//! Polling worker for the dashboard list

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::dashboard::view::DashboardView;

/// Poller worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Polling interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(4),
        }
    }
}

/// Run the poller worker
///
/// Polls once immediately, then every interval until shutdown. Failed polls
/// are logged and retried on the next tick.
pub async fn run<S, F>(
    options: &Options,
    view: &DashboardView,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Poller worker starting...");

    loop {
        debug!("Polling for services...");
        if let Err(e) = view.poll().await {
            warn!("Poll failed: {}", e);
        }

        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Poller worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }
    }
}
