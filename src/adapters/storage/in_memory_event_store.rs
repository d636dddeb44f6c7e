//! In-memory visitor log.
//!
//! Same contract as the SQLite store without a database. Used by tests and
//! handy when embedding the counter where no persistence is wanted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;
use crate::domain::visitor::VisitorEvent;
use crate::ports::{EventStore, StoreError};

/// Vector-backed visitor log.
#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: Mutex<Vec<VisitorEvent>>,
    closed: AtomicBool,
    fail_appends: AtomicBool,
}

impl InMemoryEventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Make subsequent appends fail with a write error (or stop failing).
    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    /// Number of stored events.
    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<VisitorEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        if self.is_closed() {
            return Err(StoreError::init("store is closed"));
        }
        Ok(())
    }

    async fn append(&self, count: u64) -> Result<VisitorEvent, StoreError> {
        if self.is_closed() {
            return Err(StoreError::write("store is closed"));
        }
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::write("append rejected"));
        }

        let event = VisitorEvent::new(count, Timestamp::now().to_store_string());
        self.lock().push(event.clone());
        Ok(event)
    }

    async fn read_all(&self) -> Result<Vec<VisitorEvent>, StoreError> {
        if self.is_closed() {
            return Err(StoreError::read("store is closed"));
        }
        Ok(self.lock().clone())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
