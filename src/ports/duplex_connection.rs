//! DuplexConnection port - Interface for one upgraded message connection.
//!
//! The session handler talks to clients only through this trait, which
//! keeps the lifecycle logic independent of the WebSocket library and lets
//! tests drive sessions with scripted connections.

use async_trait::async_trait;

use crate::domain::session::SessionError;

/// An inbound frame as far as the visitor counter cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// Any data or control frame. Content is discarded.
    Message,
    /// The peer asked to close the connection.
    Close,
}

/// Port for a persistent, message-framed, bidirectional connection.
#[async_trait]
pub trait DuplexConnection: Send {
    /// Send a single text frame.
    async fn send_text(&mut self, text: String) -> Result<(), SessionError>;

    /// Wait for the next inbound frame.
    ///
    /// Returns `None` at end of stream.
    async fn next_inbound(&mut self) -> Option<Result<Inbound, SessionError>>;

    /// Close the connection. Best-effort; errors are swallowed.
    async fn close(&mut self);
}
