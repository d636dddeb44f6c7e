//! axum WebSocket adapter for the DuplexConnection port.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::StreamExt;

use crate::domain::session::SessionError;
use crate::ports::{DuplexConnection, Inbound};

/// An upgraded axum WebSocket seen as a [`DuplexConnection`].
pub struct AxumConnection {
    socket: WebSocket,
    closed: bool,
}

impl AxumConnection {
    pub fn new(socket: WebSocket) -> Self {
        Self {
            socket,
            closed: false,
        }
    }
}

#[async_trait]
impl DuplexConnection for AxumConnection {
    async fn send_text(&mut self, text: String) -> Result<(), SessionError> {
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(|e| SessionError::io("send", e.to_string()))
    }

    async fn next_inbound(&mut self) -> Option<Result<Inbound, SessionError>> {
        let result = self.socket.next().await?;

        Some(match result {
            Ok(Message::Close(_)) => Ok(Inbound::Close),
            // Text, binary, ping and pong carry nothing the counter uses.
            // Pings are answered by the WebSocket layer itself.
            Ok(_) => Ok(Inbound::Message),
            Err(e) => Err(SessionError::io("receive", e.to_string())),
        })
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        // Fails harmlessly when the peer already closed.
        if let Err(e) = self.socket.send(Message::Close(None)).await {
            tracing::trace!("Close frame not delivered: {}", e);
        }
    }
}
