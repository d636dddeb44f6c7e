//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConnectionRegistry` - In-process set of live connections
//! - `EventStore` - Durable append-only visitor log
//! - `DuplexConnection` - One upgraded client connection

mod connection_registry;
mod duplex_connection;
mod event_store;

pub use connection_registry::{ConnectionRegistry, ConnectionRegistryError};
pub use duplex_connection::{DuplexConnection, Inbound};
pub use event_store::{EventStore, StoreError};
