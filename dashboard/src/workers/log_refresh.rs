//! Auto-refresh worker for the logs viewer

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

use crate::viewer::logs::LogsViewer;

/// Log refresh worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Refresh interval
    pub interval: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
        }
    }
}

/// Run the log refresh worker
///
/// Ticks every interval and re-fetches only while auto refresh is enabled.
pub async fn run<S, F>(
    options: &Options,
    viewer: &LogsViewer,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Log refresh worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Log refresh worker shutting down...");
                return;
            }
            _ = sleep_fn(options.interval) => {}
        }

        if viewer.auto_refresh().await {
            debug!("Refreshing logs...");
            viewer.refresh().await;
        }
    }
}
