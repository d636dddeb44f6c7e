//! Typed result of a finished visitor session.

use crate::domain::foundation::ConnectionId;
use crate::domain::visitor::VisitorEvent;
use crate::ports::StoreError;

use super::{SessionError, SessionState};

/// Why a session reached `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// Peer sent a close frame or the stream ended.
    PeerClosed,
    /// Reading from the peer failed.
    ReadFailed(SessionError),
    /// The welcome or count frame could not be delivered.
    SendFailed(SessionError),
    /// The registry refused the connection before it became active.
    Rejected(SessionError),
    /// The server is shutting down and drained the session.
    ServerShutdown,
}

impl CloseReason {
    /// Returns true when the session ended because of an error.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            CloseReason::ReadFailed(_) | CloseReason::SendFailed(_) | CloseReason::Rejected(_)
        )
    }
}

/// Everything a caller can assert about a finished session.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub connection_id: ConnectionId,
    /// Always `Closed` once the handler returns.
    pub final_state: SessionState,
    /// Last state reached before closing.
    pub reached: SessionState,
    /// Visitor count sent to the client, if it got that far.
    pub visitor_count: Option<u64>,
    /// Event persisted for this session, if the append succeeded.
    pub recorded: Option<VisitorEvent>,
    /// Append failure, if the store rejected the event.
    pub store_error: Option<StoreError>,
    pub close_reason: CloseReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_failures_count_as_errors() {
        assert!(!CloseReason::PeerClosed.is_error());
        assert!(!CloseReason::ServerShutdown.is_error());
        assert!(CloseReason::ReadFailed(SessionError::io("read", "reset")).is_error());
        assert!(CloseReason::SendFailed(SessionError::io("send", "reset")).is_error());
    }
}
