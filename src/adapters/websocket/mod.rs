//! WebSocket adapters for visitor connections.
//!
//! # Components
//!
//! - [`connection`] - axum `WebSocket` as a `DuplexConnection`
//! - [`handler`] - Axum WebSocket upgrade handler and route

pub mod connection;
pub mod handler;

pub use connection::AxumConnection;
pub use handler::{websocket_router, ws_handler, WebSocketState};
