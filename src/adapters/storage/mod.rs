//! Storage Adapters
//!
//! Implementations of the EventStore port for the visitor log.
//!
//! ## Available Adapters
//!
//! - **SqliteEventStore** - SQLite via sqlx (in-memory or on-disk)
//! - **InMemoryEventStore** - Vector in memory (testing/embedding)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryEventStore, SqliteEventStore};
//!
//! // Production: SQLite, in-memory by default
//! let store = SqliteEventStore::connect(&config.database).await?;
//!
//! // Testing: in-memory vector
//! let store = InMemoryEventStore::new();
//! ```

mod in_memory_event_store;
mod sqlite_event_store;

pub use in_memory_event_store::InMemoryEventStore;
pub use sqlite_event_store::SqliteEventStore;
