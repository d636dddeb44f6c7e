//! WebSocket upgrade handler for visitor connections.
//!
//! Handles the HTTP → WebSocket upgrade and hands the connection to the
//! session handler:
//! 1. Reject requests that are not WebSocket upgrades
//! 2. Refuse early when the connection limit is reached
//! 3. Upgrade to WebSocket
//! 4. Run the visitor session until disconnect

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::VisitorSessionHandler;
use crate::domain::session::SessionError;

use super::connection::AxumConnection;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    /// Session handler shared by all connections.
    pub sessions: VisitorSessionHandler,
    /// Connection limit checked before upgrading.
    pub capacity_limit: Option<usize>,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(sessions: VisitorSessionHandler, capacity_limit: Option<usize>) -> Self {
        Self {
            sessions,
            capacity_limit,
        }
    }
}

/// Handle WebSocket upgrade requests for visitors.
///
/// Route: `GET /ws`
///
/// Any origin is accepted. Non-upgrade requests get axum's rejection
/// response and never touch the registry or the visitor log.
pub async fn ws_handler(
    State(state): State<WebSocketState>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            let error = SessionError::upgrade(rejection.body_text());
            tracing::warn!(status = %rejection.status(), %error, "Rejected visitor request");
            return rejection.into_response();
        }
    };

    // The registry enforces the limit as well; this only avoids upgrading
    // a connection that would be refused anyway.
    if let Some(limit) = state.capacity_limit {
        if state.sessions.registry().size() >= limit {
            tracing::warn!(limit, "Visitor limit reached, refusing upgrade");
            return (StatusCode::SERVICE_UNAVAILABLE, "Visitor limit reached").into_response();
        }
    }

    let sessions = state.sessions;
    // Counted from here so shutdown waits for sessions that have been
    // accepted but not yet registered. A failed upgrade drops the callback
    // and with it the ticket.
    let ticket = sessions.tracker().begin();
    ws.on_failed_upgrade(|e: axum::Error| {
        let error = SessionError::upgrade(e.to_string());
        tracing::warn!(%error, "WebSocket upgrade failed");
    })
    .on_upgrade(move |socket| async move {
        let _outcome = sessions.handle(AxumConnection::new(socket)).await;
        drop(ticket);
    })
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .merge(websocket_router().with_state(ws_state));
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/ws", get(ws_handler))
}
