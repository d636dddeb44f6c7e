//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Landing page and the assembled axum router
//! - `registry` - Live connection set
//! - `storage` - Visitor log (SQLite, in-memory)
//! - `websocket` - `/ws` upgrade handler and socket wrapper

pub mod http;
pub mod registry;
pub mod storage;
pub mod websocket;

pub use http::app_router;
pub use registry::InMemoryConnectionRegistry;
pub use storage::{InMemoryEventStore, SqliteEventStore};
pub use websocket::{AxumConnection, WebSocketState};
