//! EventStore port - Interface for the durable visitor log.
//!
//! The store is an append-only log of `(count, time)` records. It is not a
//! query engine: the only reads are the full scan used for the shutdown
//! summary and for diagnostics.
//!
//! ## Lifecycle
//!
//! 1. `initialize()` once before serving (failure is fatal)
//! 2. `append()` once per successful registration
//! 3. `read_all()` once at shutdown
//! 4. `close()` last

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::visitor::VisitorEvent;

/// Errors raised by event store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing medium could not be opened or the schema not created.
    #[error("event store initialization failed: {0}")]
    Init(String),

    /// Appending a visitor event failed.
    #[error("event store write failed: {0}")]
    Write(String),

    /// Scanning the visitor log failed.
    #[error("event store read failed: {0}")]
    Read(String),
}

impl StoreError {
    pub fn init(reason: impl Into<String>) -> Self {
        StoreError::Init(reason.into())
    }

    pub fn write(reason: impl Into<String>) -> Self {
        StoreError::Write(reason.into())
    }

    pub fn read(reason: impl Into<String>) -> Self {
        StoreError::Read(reason.into())
    }
}

/// Port for the append-only visitor log.
///
/// Implementations must make each append atomic with respect to concurrent
/// appends and return events from `read_all` in insertion order.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Create the backing store and the `visitors` schema if absent.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Persist a visitor event with the given count and a store-generated
    /// timestamp. Returns the stored event.
    async fn append(&self, count: u64) -> Result<VisitorEvent, StoreError>;

    /// Return every stored event in insertion order.
    async fn read_all(&self) -> Result<Vec<VisitorEvent>, StoreError>;

    /// Release the backing medium. Idempotent.
    async fn close(&self);
}
