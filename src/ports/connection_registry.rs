//! ConnectionRegistry port - Interface for tracking live visitor connections.
//!
//! The registry is the set of connections whose session loop is currently
//! running. Its size is the visitor count reported to each joining client.
//!
//! ## Use Case
//!
//! 1. Client upgrades `/ws`
//! 2. Session handler adds the connection id
//! 3. Session handler reads `size()` and reports it to the new client
//! 4. On disconnect the session handler removes the id
//!
//! Implementations must serialize every mutation and size read through a
//! single lock so no caller observes a partially updated set.

use crate::domain::foundation::ConnectionId;

/// Errors that can occur in connection registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRegistryError {
    /// A connection limit is configured and already reached.
    #[error("connection limit of {limit} reached")]
    AtCapacity { limit: usize },
}

/// Port for the in-process set of live connections.
///
/// All operations are O(1) edits under an exclusive lock and never block
/// on I/O, so they are plain synchronous calls.
///
/// # Example
///
/// ```ignore
/// registry.add(connection_id)?;
/// let visitors = registry.size();
/// // ... session runs ...
/// registry.remove(&connection_id);
/// ```
pub trait ConnectionRegistry: Send + Sync {
    /// Insert a connection.
    ///
    /// Returns `Ok(true)` if the id was newly inserted and `Ok(false)` if it
    /// was already present (no-op).
    fn add(&self, connection_id: ConnectionId) -> Result<bool, ConnectionRegistryError>;

    /// Remove a connection if present.
    ///
    /// Idempotent: removing an absent id returns `false` and never fails.
    fn remove(&self, connection_id: &ConnectionId) -> bool;

    /// Current number of live connections.
    fn size(&self) -> usize;

    /// Check whether a connection is currently registered.
    fn contains(&self, connection_id: &ConnectionId) -> bool;
}
