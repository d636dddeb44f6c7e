//! Route configuration for the whole HTTP surface.
//!
//! Configures the Axum router with the landing page and the visitor
//! WebSocket endpoint.

use std::path::Path;

use axum::routing::get_service;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, WebSocketState};

/// Creates the application router.
///
/// Routes:
/// - `GET /` - Landing page read from `index_path`
/// - `GET /ws` - Visitor WebSocket upgrade
pub fn app_router(ws_state: WebSocketState, index_path: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get_service(ServeFile::new(index_path.as_ref())))
        .merge(websocket_router().with_state(ws_state))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
