//! VisitorSessionHandler - Drives one visitor connection from join to close.
//!
//! Lifecycle per connection:
//! 1. Add the connection to the registry
//! 2. Send the welcome notice
//! 3. Read the registry size and send it back to the same connection
//! 4. Append that size to the visitor log
//! 5. Discard inbound frames until the peer leaves or the server shuts down
//! 6. Remove the connection from the registry and close it
//!
//! Step 6 runs on every exit path. Registry removal is tied to a drop guard
//! so it also runs if the session task panics.

use std::sync::Arc;

use crate::application::shutdown::{SessionTracker, ShutdownSignal};
use crate::domain::foundation::{ConnectionId, StateMachine};
use crate::domain::session::{
    visitor_count_notice, CloseReason, SessionError, SessionOutcome, SessionState,
    WELCOME_NOTICE,
};
use crate::domain::visitor::VisitorEvent;
use crate::ports::{ConnectionRegistry, DuplexConnection, EventStore, Inbound, StoreError};

/// Handler for visitor sessions. Cheap to clone; one clone per connection.
#[derive(Clone)]
pub struct VisitorSessionHandler {
    registry: Arc<dyn ConnectionRegistry>,
    store: Arc<dyn EventStore>,
    shutdown: ShutdownSignal,
    tracker: SessionTracker,
}

impl VisitorSessionHandler {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        store: Arc<dyn EventStore>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            registry,
            store,
            shutdown,
            tracker: SessionTracker::new(),
        }
    }

    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    /// Sessions accepted by the transport but not yet finished, shared by
    /// every clone of this handler.
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Run a session on an already-upgraded connection with a fresh id.
    pub async fn handle<C: DuplexConnection>(&self, conn: C) -> SessionOutcome {
        self.handle_with_id(ConnectionId::new(), conn).await
    }

    /// Run a session on an already-upgraded connection.
    ///
    /// Never returns an error: every failure is contained in the session
    /// and reported through [`SessionOutcome::close_reason`].
    pub async fn handle_with_id<C: DuplexConnection>(
        &self,
        connection_id: ConnectionId,
        mut conn: C,
    ) -> SessionOutcome {
        let mut session = SessionProgress::new(connection_id);
        session.advance(SessionState::Registered);

        let guard = match RegistrationGuard::acquire(self.registry.clone(), connection_id) {
            Ok(guard) => guard,
            Err(e) => {
                tracing::warn!(%connection_id, error = %e, "Connection refused by registry");
                conn.close().await;
                return session.finish(CloseReason::Rejected(e));
            }
        };

        let close_reason = match self.join(&mut conn, &mut session).await {
            Ok(()) => {
                session.advance(SessionState::Active);
                self.idle(&mut conn, connection_id).await
            }
            Err(e) => {
                tracing::debug!(%connection_id, error = %e, "Failed to greet visitor");
                CloseReason::SendFailed(e)
            }
        };

        drop(guard);
        conn.close().await;

        tracing::debug!(
            %connection_id,
            reason = ?close_reason,
            visitors = self.registry.size(),
            "Visitor session closed"
        );
        session.finish(close_reason)
    }

    /// Greet the new visitor, report the count, and log the visit.
    async fn join<C: DuplexConnection>(
        &self,
        conn: &mut C,
        session: &mut SessionProgress,
    ) -> Result<(), SessionError> {
        conn.send_text(WELCOME_NOTICE.to_string()).await?;

        let count = self.registry.size() as u64;
        conn.send_text(visitor_count_notice(count)).await?;
        session.visitor_count = Some(count);

        // A lost visit record must not end an otherwise healthy session.
        match self.store.append(count).await {
            Ok(event) => {
                tracing::info!(connection_id = %session.connection_id, count, "Visitor joined");
                session.recorded = Some(event);
            }
            Err(e) => {
                tracing::error!(
                    connection_id = %session.connection_id,
                    count,
                    error = %e,
                    "Failed to record visitor event"
                );
                session.store_error = Some(e);
            }
        }

        Ok(())
    }

    /// Discard inbound frames until the peer leaves or shutdown fires.
    async fn idle<C: DuplexConnection>(
        &self,
        conn: &mut C,
        connection_id: ConnectionId,
    ) -> CloseReason {
        let mut shutdown = self.shutdown.clone();

        loop {
            tokio::select! {
                inbound = conn.next_inbound() => match inbound {
                    Some(Ok(Inbound::Message)) => {
                        tracing::trace!(%connection_id, "Discarded inbound frame");
                    }
                    Some(Ok(Inbound::Close)) | None => return CloseReason::PeerClosed,
                    Some(Err(e)) => {
                        tracing::debug!(%connection_id, error = %e, "Receive error");
                        return CloseReason::ReadFailed(e);
                    }
                },
                () = shutdown.wait() => return CloseReason::ServerShutdown,
            }
        }
    }
}

/// Registry membership held for the lifetime of a session.
///
/// Dropping the guard removes the connection, on every exit path.
struct RegistrationGuard {
    registry: Arc<dyn ConnectionRegistry>,
    connection_id: ConnectionId,
}

impl RegistrationGuard {
    fn acquire(
        registry: Arc<dyn ConnectionRegistry>,
        connection_id: ConnectionId,
    ) -> Result<Self, SessionError> {
        // An id already present belongs to another session; this guard must
        // never remove it.
        if !registry.add(connection_id)? {
            return Err(SessionError::AlreadyRegistered(connection_id));
        }
        Ok(Self {
            registry,
            connection_id,
        })
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.remove(&self.connection_id);
    }
}

/// Mutable bookkeeping while a session runs.
struct SessionProgress {
    connection_id: ConnectionId,
    state: SessionState,
    visitor_count: Option<u64>,
    recorded: Option<VisitorEvent>,
    store_error: Option<StoreError>,
}

impl SessionProgress {
    fn new(connection_id: ConnectionId) -> Self {
        Self {
            connection_id,
            state: SessionState::Connecting,
            visitor_count: None,
            recorded: None,
            store_error: None,
        }
    }

    fn advance(&mut self, target: SessionState) {
        match self.state.transition_to(target) {
            Ok(next) => self.state = next,
            Err(e) => tracing::error!(
                connection_id = %self.connection_id,
                error = %e,
                "Invalid session transition"
            ),
        }
    }

    fn finish(mut self, close_reason: CloseReason) -> SessionOutcome {
        let reached = self.state;
        self.advance(SessionState::Closed);

        SessionOutcome {
            connection_id: self.connection_id,
            final_state: self.state,
            reached,
            visitor_count: self.visitor_count,
            recorded: self.recorded,
            store_error: self.store_error,
            close_reason,
        }
    }
}
