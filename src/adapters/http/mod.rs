//! HTTP adapters - Router for the landing page and WebSocket endpoint.

mod router;

pub use router::app_router;
