//! Watch-mode run loop

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::app::options::AppOptions;
use crate::app::state::AppState;
use crate::dashboard::view::DashboardState;
use crate::errors::DashboardError;
use crate::models::notification::Notification;
use crate::viewer::logs::LogsState;
use crate::workers::{log_refresh, poller};

/// What a watch session keeps refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Poll the service list
    pub dashboard: bool,

    /// Re-fetch the selected honeypot's logs
    pub follow_logs: bool,
}

/// Draws state changes while a watch session runs
pub trait Renderer: Send + Sync + 'static {
    fn dashboard(&self, _state: &DashboardState) {}

    fn logs(&self, _state: &LogsState) {}

    fn notification(&self, _notification: &Notification) {}
}

/// Run the workers selected by `watch` until `shutdown_signal` resolves
pub async fn run(
    state: Arc<AppState>,
    options: &AppOptions,
    watch: WatchOptions,
    renderer: Arc<dyn Renderer>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DashboardError> {
    info!("Starting watch session...");

    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.max_shutdown_delay);

    if let Err(e) = init(&state, options, watch, renderer, &shutdown_tx, &mut shutdown_manager) {
        error!("Failed to start watch session: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

fn init(
    state: &Arc<AppState>,
    options: &AppOptions,
    watch: WatchOptions,
    renderer: Arc<dyn Renderer>,
    shutdown_tx: &broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<(), DashboardError> {
    init_render_worker(state.clone(), watch, renderer, shutdown_manager, shutdown_tx.subscribe())?;

    if watch.dashboard {
        init_poller_worker(
            options.poller.clone(),
            state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )?;
    }

    if watch.follow_logs {
        init_log_refresh_worker(
            options.log_refresh.clone(),
            state.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )?;
    }

    Ok(())
}

fn init_poller_worker(
    options: poller::Options,
    state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing poller worker...");

    let dashboard = state.dashboard.clone();

    let poller_handle = tokio::spawn(async move {
        poller::run(
            &options,
            dashboard.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_poller_worker_handle(poller_handle)
}

fn init_log_refresh_worker(
    options: log_refresh::Options,
    state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing log refresh worker...");

    let logs = state.logs.clone();

    let log_refresh_handle = tokio::spawn(async move {
        log_refresh::run(
            &options,
            logs.as_ref(),
            tokio::time::sleep,
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_log_refresh_worker_handle(log_refresh_handle)
}

fn init_render_worker(
    state: Arc<AppState>,
    watch: WatchOptions,
    renderer: Arc<dyn Renderer>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DashboardError> {
    info!("Initializing render worker...");

    let mut dashboard_rx = state.dashboard.subscribe();
    let mut logs_rx = state.logs.subscribe();
    let mut notification_rx = state.notifications.subscribe();

    let render_handle = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Render worker shutting down...");
                    return;
                }
                Ok(()) = dashboard_rx.changed(), if watch.dashboard => {
                    renderer.dashboard(&state.dashboard.snapshot().await);
                }
                Ok(()) = logs_rx.changed(), if watch.follow_logs => {
                    renderer.logs(&state.logs.snapshot().await);
                }
                Ok(()) = notification_rx.changed() => {
                    let current = notification_rx.borrow_and_update().clone();
                    if let Some(notification) = current {
                        renderer.notification(&notification);
                    }
                }
            }
        }
    });

    shutdown_manager.with_render_worker_handle(render_handle)
}

// ================================= SHUTDOWN ===================================== //

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    max_shutdown_delay: Duration,
    poller_worker_handle: Option<JoinHandle<()>>,
    log_refresh_worker_handle: Option<JoinHandle<()>>,
    render_worker_handle: Option<JoinHandle<()>>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, max_shutdown_delay: Duration) -> Self {
        Self {
            shutdown_tx,
            max_shutdown_delay,
            poller_worker_handle: None,
            log_refresh_worker_handle: None,
            render_worker_handle: None,
        }
    }

    pub fn with_poller_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), DashboardError> {
        if self.poller_worker_handle.is_some() {
            return Err(DashboardError::ShutdownError("poller_handle already set".to_string()));
        }
        self.poller_worker_handle = Some(handle);
        Ok(())
    }

    pub fn with_log_refresh_worker_handle(
        &mut self,
        handle: JoinHandle<()>,
    ) -> Result<(), DashboardError> {
        if self.log_refresh_worker_handle.is_some() {
            return Err(DashboardError::ShutdownError("log_refresh_handle already set".to_string()));
        }
        self.log_refresh_worker_handle = Some(handle);
        Ok(())
    }

    pub fn with_render_worker_handle(&mut self, handle: JoinHandle<()>) -> Result<(), DashboardError> {
        if self.render_worker_handle.is_some() {
            return Err(DashboardError::ShutdownError("render_handle already set".to_string()));
        }
        self.render_worker_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), DashboardError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(self.max_shutdown_delay, self.shutdown_impl()).await {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, aborting workers...",
                    self.max_shutdown_delay
                );
                self.abort_all();
                Err(DashboardError::ShutdownError("shutdown timed out".to_string()))
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), DashboardError> {
        info!("Shutting down watch session...");

        // 1. Poller worker
        if let Some(handle) = self.poller_worker_handle.take() {
            handle.await.map_err(|e| DashboardError::ShutdownError(e.to_string()))?;
        }

        // 2. Log refresh worker
        if let Some(handle) = self.log_refresh_worker_handle.take() {
            handle.await.map_err(|e| DashboardError::ShutdownError(e.to_string()))?;
        }

        // 3. Render worker
        if let Some(handle) = self.render_worker_handle.take() {
            handle.await.map_err(|e| DashboardError::ShutdownError(e.to_string()))?;
        }

        info!("Shutdown complete");
        Ok(())
    }

    fn abort_all(&mut self) {
        for handle in [
            self.poller_worker_handle.take(),
            self.log_refresh_worker_handle.take(),
            self.render_worker_handle.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}
