//! In-memory connection registry.
//!
//! The live set of connections for a single server process. Membership is
//! held in a `HashSet` behind one `Mutex`; every add, remove and size read
//! takes the same lock.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::foundation::ConnectionId;
use crate::ports::{ConnectionRegistry, ConnectionRegistryError};

/// Set of live visitor connections.
///
/// # Thread Safety
///
/// Uses a single `Mutex` rather than an `RwLock`: size reads must see the
/// same serialization order as mutations, and the critical sections are a
/// single hash-set operation. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryConnectionRegistry {
    connections: Mutex<HashSet<ConnectionId>>,
    capacity_limit: Option<usize>,
}

impl InMemoryConnectionRegistry {
    /// Create an unbounded registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that refuses new connections once `limit` are live.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            connections: Mutex::new(HashSet::new()),
            capacity_limit: Some(limit),
        }
    }

    /// Configured connection limit, if any.
    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// Snapshot of the registered ids (for monitoring/debugging).
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.lock().iter().copied().collect()
    }

    // A panic elsewhere cannot leave a HashSet half-edited, so poisoning is
    // recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, HashSet<ConnectionId>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConnectionRegistry for InMemoryConnectionRegistry {
    fn add(&self, connection_id: ConnectionId) -> Result<bool, ConnectionRegistryError> {
        let mut connections = self.lock();

        if connections.contains(&connection_id) {
            return Ok(false);
        }
        if let Some(limit) = self.capacity_limit {
            if connections.len() >= limit {
                return Err(ConnectionRegistryError::AtCapacity { limit });
            }
        }

        Ok(connections.insert(connection_id))
    }

    fn remove(&self, connection_id: &ConnectionId) -> bool {
        self.lock().remove(connection_id)
    }

    fn size(&self) -> usize {
        self.lock().len()
    }

    fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.lock().contains(connection_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[test]
    fn add_increases_size() {
        let registry = InMemoryConnectionRegistry::new();

        assert_eq!(registry.add(ConnectionId::new()), Ok(true));
        assert_eq!(registry.add(ConnectionId::new()), Ok(true));

        assert_eq!(registry.size(), 2);
    }

    #[test]
    fn add_existing_is_noop() {
        let registry = InMemoryConnectionRegistry::new();
        let id = ConnectionId::new();

        assert_eq!(registry.add(id), Ok(true));
        assert_eq!(registry.add(id), Ok(false));

        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn remove_absent_is_noop() {
        let registry = InMemoryConnectionRegistry::new();
        registry.add(ConnectionId::new()).unwrap();

        assert!(!registry.remove(&ConnectionId::new()));
        assert_eq!(registry.size(), 1);
    }

    #[test]
    fn remove_twice_is_idempotent() {
        let registry = InMemoryConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.add(id).unwrap();

        assert!(registry.remove(&id));
        assert!(!registry.remove(&id));
        assert_eq!(registry.size(), 0);
        assert!(!registry.contains(&id));
    }

    #[test]
    fn capacity_limit_refuses_new_connections() {
        let registry = InMemoryConnectionRegistry::with_capacity_limit(2);
        let first = ConnectionId::new();
        registry.add(first).unwrap();
        registry.add(ConnectionId::new()).unwrap();

        let refused = registry.add(ConnectionId::new());

        assert_eq!(refused, Err(ConnectionRegistryError::AtCapacity { limit: 2 }));
        assert_eq!(registry.size(), 2);
        // Re-adding a member is still a no-op, not a refusal.
        assert_eq!(registry.add(first), Ok(false));
    }

    #[test]
    fn capacity_frees_up_after_remove() {
        let registry = InMemoryConnectionRegistry::with_capacity_limit(1);
        let first = ConnectionId::new();
        registry.add(first).unwrap();
        registry.remove(&first);

        assert_eq!(registry.add(ConnectionId::new()), Ok(true));
    }

    #[test]
    fn connection_ids_snapshot_matches_members() {
        let registry = InMemoryConnectionRegistry::new();
        let id = ConnectionId::new();
        registry.add(id).unwrap();

        assert_eq!(registry.connection_ids(), vec![id]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_are_not_lost() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());

        let tasks: Vec<_> = (0..200)
            .map(|_| {
                let registry = registry.clone();
                tokio::spawn(async move { registry.add(ConnectionId::new()) })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(true));
        }

        assert_eq!(registry.size(), 200);
    }

    proptest! {
        #[test]
        fn concurrent_registrations_all_counted(n in 1usize..64) {
            let registry = Arc::new(InMemoryConnectionRegistry::new());

            let handles: Vec<_> = (0..n)
                .map(|_| {
                    let registry = registry.clone();
                    std::thread::spawn(move || registry.add(ConnectionId::new()).unwrap())
                })
                .collect();
            for handle in handles {
                prop_assert!(handle.join().unwrap());
            }

            prop_assert_eq!(registry.size(), n);
        }

        #[test]
        fn matching_removes_return_size_to_zero(n in 0usize..64, absent in 0usize..8) {
            let registry = Arc::new(InMemoryConnectionRegistry::new());
            let ids: Vec<ConnectionId> = (0..n).map(|_| ConnectionId::new()).collect();

            for id in &ids {
                registry.add(*id).unwrap();
            }
            for _ in 0..absent {
                registry.remove(&ConnectionId::new());
            }
            prop_assert_eq!(registry.size(), n);

            let handles: Vec<_> = ids
                .into_iter()
                .map(|id| {
                    let registry = registry.clone();
                    std::thread::spawn(move || registry.remove(&id))
                })
                .collect();
            for handle in handles {
                prop_assert!(handle.join().unwrap());
            }

            prop_assert_eq!(registry.size(), 0);
        }
    }
}
