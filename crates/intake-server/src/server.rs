//! Server assembly and lifecycle

use crate::config::{ConfigError, IntakeConfig};
use crate::routes;
use intake_dispatch::{IntakeDispatcher, LogMailer, MailComposer, NotificationQueue};
use intake_store::{IntakeStore, StoreError};
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Errors raised while starting or running the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind: {0}")]
    Bind(#[from] warp::Error),
}

/// Configured store plus everything needed to serve it
#[derive(Debug)]
pub struct IntakeServer {
    config: IntakeConfig,
    store: Arc<IntakeStore>,
}

impl IntakeServer {
    /// Open (and bootstrap) the configured database
    pub fn open(config: IntakeConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let store = IntakeStore::open(&config.database.path, &config.database.store_options())?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    #[must_use]
    pub fn with_store(config: IntakeConfig, store: Arc<IntakeStore>) -> Self {
        Self { config, store }
    }

    #[must_use]
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &Arc<IntakeStore> {
        &self.store
    }

    /// Dispatcher over this store. When notifications are enabled the
    /// delivery task is spawned on the current runtime and returned.
    pub fn dispatcher(&self) -> (IntakeDispatcher, Option<JoinHandle<()>>) {
        let dispatcher = IntakeDispatcher::new(self.store.clone());
        let notifications = &self.config.notifications;
        if !notifications.enabled {
            return (dispatcher, None);
        }
        let mailer = LogMailer::new(MailComposer::new(notifications.recipient.clone()));
        let (handle, task) = NotificationQueue::spawn(Arc::new(mailer), notifications.queue_capacity);
        (dispatcher.with_notifier(handle), Some(task))
    }

    /// Serve until `shutdown` resolves, then drain pending notifications
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (dispatcher, notifications) = self.dispatcher();
        let routes = routes::routes(dispatcher, &self.config.server);
        let (addr, server) =
            warp::serve(routes).try_bind_with_graceful_shutdown(self.config.server.bind, shutdown)?;
        info!(%addr, route = %self.config.server.route, "intake server listening");

        server.await;
        info!("intake server stopped");

        if let Some(task) = notifications {
            if let Err(err) = task.await {
                warn!(error = %err, "notification task ended abnormally");
            }
        }
        Ok(())
    }
}

/// Resolves on Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable, waiting for Ctrl-C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown requested");
}
