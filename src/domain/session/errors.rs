//! Session-specific error types.

use thiserror::Error;

use crate::domain::foundation::ConnectionId;
use crate::ports::ConnectionRegistryError;

/// Errors that end a single visitor session.
///
/// None of these propagate beyond the session task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Transport could not be upgraded to a duplex connection.
    #[error("upgrade failed: {0}")]
    Upgrade(String),

    /// Send or receive failed on an active connection.
    #[error("connection I/O failed during {operation}: {reason}")]
    Io {
        operation: &'static str,
        reason: String,
    },

    /// The connection registry refused the connection.
    #[error("registration refused: {0}")]
    Registry(#[from] ConnectionRegistryError),

    /// Another live session already owns this connection id.
    #[error("connection {0} is already registered")]
    AlreadyRegistered(ConnectionId),
}

impl SessionError {
    pub fn upgrade(reason: impl Into<String>) -> Self {
        SessionError::Upgrade(reason.into())
    }

    pub fn io(operation: &'static str, reason: impl Into<String>) -> Self {
        SessionError::Io {
            operation,
            reason: reason.into(),
        }
    }
}
