//! SummarizeVisitorsHandler - Query handler for the shutdown summary.

use std::sync::Arc;

use crate::domain::visitor::VisitorLog;
use crate::ports::{EventStore, StoreError};

/// Handler that scans the visitor log and summarizes it.
pub struct SummarizeVisitorsHandler {
    store: Arc<dyn EventStore>,
}

impl SummarizeVisitorsHandler {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<VisitorLog, StoreError> {
        let events = self.store.read_all().await?;
        Ok(VisitorLog::new(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryEventStore;

    #[tokio::test]
    async fn summarizes_every_stored_event() {
        let store = Arc::new(InMemoryEventStore::new());
        for count in [1, 2, 1] {
            store.append(count).await.unwrap();
        }
        let handler = SummarizeVisitorsHandler::new(store);

        let log = handler.handle().await.unwrap();

        assert_eq!(log.events.len(), 3);
        assert_eq!(log.summary.total_events, 3);
        assert_eq!(log.summary.peak_count, 2);
    }

    #[tokio::test]
    async fn empty_log_summarizes_to_nothing() {
        let handler = SummarizeVisitorsHandler::new(Arc::new(InMemoryEventStore::new()));

        let log = handler.handle().await.unwrap();

        assert!(log.summary.is_empty());
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let store = Arc::new(InMemoryEventStore::new());
        store.close().await;
        let handler = SummarizeVisitorsHandler::new(store);

        assert!(matches!(handler.handle().await, Err(StoreError::Read(_))));
    }
}
