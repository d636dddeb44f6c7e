//! Server lifecycle - wiring, serving, draining and the shutdown summary.
//!
//! ```text
//! initialize store ──► bind ──► serve ──► shutdown signal
//!                                              │
//!            close store ◄── summarize ◄── drain sessions
//! ```
//!
//! The registry and store are built once here and passed into the session
//! handler; nothing is process-global.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::adapters::http::app_router;
use crate::adapters::registry::InMemoryConnectionRegistry;
use crate::adapters::storage::SqliteEventStore;
use crate::adapters::websocket::WebSocketState;
use crate::application::{
    drain_sessions, shutdown_channel, ShutdownTrigger, SummarizeVisitorsHandler,
    VisitorSessionHandler,
};
use crate::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use crate::domain::visitor::VisitorLog;
use crate::ports::{ConnectionRegistry, EventStore, StoreError};

/// Errors that stop the server from starting or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully wired visitor counter.
///
/// Clones share the same registry, store and shutdown trigger.
#[derive(Clone)]
pub struct VisitorServer {
    config: ServerConfig,
    registry: Arc<dyn ConnectionRegistry>,
    store: Arc<dyn EventStore>,
    trigger: Arc<ShutdownTrigger>,
    sessions: VisitorSessionHandler,
}

impl VisitorServer {
    /// Build a server from configuration, opening and initializing the
    /// SQLite visitor log.
    pub async fn bootstrap(config: &AppConfig) -> Result<Self, StartupError> {
        config.validate()?;

        let store = SqliteEventStore::connect(&config.database).await?;
        tracing::info!(
            url = %config.database.url,
            in_memory = config.database.is_in_memory(),
            "Visitor log initialized"
        );

        let registry = match config.server.max_connections {
            Some(limit) => InMemoryConnectionRegistry::with_capacity_limit(limit),
            None => InMemoryConnectionRegistry::new(),
        };

        Ok(Self::new(
            config.server.clone(),
            Arc::new(registry),
            Arc::new(store),
        ))
    }

    /// Build a server from already-initialized parts.
    pub fn new(
        config: ServerConfig,
        registry: Arc<dyn ConnectionRegistry>,
        store: Arc<dyn EventStore>,
    ) -> Self {
        let (trigger, signal) = shutdown_channel();
        let sessions = VisitorSessionHandler::new(registry.clone(), store.clone(), signal);

        Self {
            config,
            registry,
            store,
            trigger: Arc::new(trigger),
            sessions,
        }
    }

    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Sessions accepted by `/ws` whose task has not finished yet. Counts
    /// upgrades that have not reached the registry.
    pub fn open_sessions(&self) -> usize {
        self.sessions.tracker().open()
    }

    /// The full HTTP router for this server.
    pub fn router(&self) -> axum::Router {
        let ws_state = WebSocketState::new(self.sessions.clone(), self.config.max_connections);
        app_router(ws_state, &self.config.index_path)
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, StartupError> {
        let addr = self.config.socket_addr()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Visitor counter listening");
        Ok(listener)
    }

    /// Serve until `signal` resolves, then stop accepting, tell open
    /// sessions to close, and wait up to the grace period for them.
    ///
    /// Returns true if every session closed within the grace period.
    pub async fn serve<F>(&self, listener: TcpListener, signal: F) -> Result<bool, StartupError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let trigger = self.trigger.clone();

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                signal.await;
                tracing::info!("Shutdown requested, closing visitor sessions");
                trigger.trigger();
            })
            .await?;

        // Upgraded connections outlive the HTTP server; the trigger has
        // already asked them to close.
        let drained = drain_sessions(
            self.registry.as_ref(),
            self.sessions.tracker(),
            self.config.shutdown_grace(),
        )
        .await;
        if drained {
            tracing::info!("All visitor sessions closed");
        } else {
            tracing::warn!(
                remaining = self.registry.size(),
                pending = self.open_sessions(),
                grace_secs = self.config.shutdown_grace_secs,
                "Shutdown grace period elapsed with sessions still open"
            );
        }

        Ok(drained)
    }

    /// Scan the visitor log for the shutdown summary.
    pub async fn summarize(&self) -> Result<VisitorLog, StoreError> {
        SummarizeVisitorsHandler::new(self.store.clone())
            .handle()
            .await
    }

    /// Release the visitor log.
    pub async fn close(&self) {
        self.store.close().await;
        tracing::debug!("Visitor log closed");
    }
}
