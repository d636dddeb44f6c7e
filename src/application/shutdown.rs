//! Graceful shutdown coordination.
//!
//! The server owns a [`ShutdownTrigger`]; every session holds a cloned
//! [`ShutdownSignal`] and leaves its idle loop once the trigger fires.
//! [`drain_sessions`] then waits, bounded by a grace period, for the
//! connection registry to empty and for every accepted upgrade still
//! waiting to run its session (tracked by [`SessionTracker`]).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::ports::ConnectionRegistry;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Creates a connected trigger/signal pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, ShutdownSignal { rx })
}

/// Owning side of the shutdown channel.
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Tell every session to close. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Another signal attached to this trigger.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Listening side of the shutdown channel, cheap to clone per session.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns true once the trigger has fired.
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when the trigger fires.
    ///
    /// A trigger dropped without firing never resolves this.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Counts sessions from the moment an upgrade is accepted until the
/// session task returns.
///
/// A session is not in the registry until after its socket upgrade
/// completes, so the registry alone cannot tell shutdown about it.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    open: Arc<AtomicUsize>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more session until the returned ticket is dropped.
    pub fn begin(&self) -> SessionTicket {
        self.open.fetch_add(1, Ordering::SeqCst);
        SessionTicket {
            open: self.open.clone(),
        }
    }

    /// Sessions accepted and not yet finished.
    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

/// One counted session. Dropping it, on any path, uncounts it.
#[derive(Debug)]
pub struct SessionTicket {
    open: Arc<AtomicUsize>,
}

impl Drop for SessionTicket {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Wait until no sessions remain registered or pending, or until `grace`
/// elapses.
///
/// Returns true if everything finished in time.
pub async fn drain_sessions(
    registry: &dyn ConnectionRegistry,
    tracker: &SessionTracker,
    grace: Duration,
) -> bool {
    let emptied = async {
        while registry.size() > 0 || tracker.open() > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    };

    tokio::time::timeout(grace, emptied).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::registry::InMemoryConnectionRegistry;
    use crate::domain::foundation::ConnectionId;

    #[tokio::test]
    async fn signal_resolves_after_trigger() {
        let (trigger, mut signal) = shutdown_channel();
        assert!(!signal.is_triggered());

        trigger.trigger();

        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .expect("signal should resolve");
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn signal_created_after_trigger_is_already_fired() {
        let (trigger, _signal) = shutdown_channel();
        trigger.trigger();

        let mut late = trigger.signal();

        assert!(late.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), late.wait())
            .await
            .expect("late signal should resolve immediately");
    }

    #[tokio::test]
    async fn dropped_trigger_never_fires() {
        let (trigger, mut signal) = shutdown_channel();
        drop(trigger);

        let waited = tokio::time::timeout(Duration::from_millis(50), signal.wait()).await;

        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn drain_returns_immediately_when_empty() {
        let registry = InMemoryConnectionRegistry::new();

        assert!(drain_sessions(&registry, &SessionTracker::new(), Duration::from_millis(10)).await);
    }

    #[tokio::test]
    async fn drain_waits_for_last_session() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let id = ConnectionId::new();
        registry.add(id).unwrap();

        let remover = {
            let registry = registry.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                registry.remove(&id);
            })
        };

        assert!(drain_sessions(registry.as_ref(), &SessionTracker::new(), Duration::from_secs(2)).await);
        remover.await.unwrap();
    }

    #[tokio::test]
    async fn drain_gives_up_after_grace() {
        let registry = InMemoryConnectionRegistry::new();
        registry.add(ConnectionId::new()).unwrap();

        assert!(!drain_sessions(&registry, &SessionTracker::new(), Duration::from_millis(60)).await);
        assert_eq!(registry.size(), 1);
    }

    #[tokio::test]
    async fn drain_waits_for_accepted_session_not_yet_registered() {
        let registry = InMemoryConnectionRegistry::new();
        let tracker = SessionTracker::new();
        let ticket = tracker.begin();
        assert_eq!(tracker.open(), 1);

        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            drop(ticket);
        });

        let started = tokio::time::Instant::now();
        assert!(drain_sessions(&registry, &tracker, Duration::from_secs(2)).await);
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(tracker.open(), 0);
        release.await.unwrap();
    }

    #[tokio::test]
    async fn drain_gives_up_on_stuck_pending_session() {
        let registry = InMemoryConnectionRegistry::new();
        let tracker = SessionTracker::new();
        let _ticket = tracker.begin();

        assert!(!drain_sessions(&registry, &tracker, Duration::from_millis(60)).await);
    }

    #[test]
    fn tickets_count_independently() {
        let tracker = SessionTracker::new();
        let first = tracker.begin();
        let second = tracker.clone().begin();
        assert_eq!(tracker.open(), 2);

        drop(first);
        assert_eq!(tracker.open(), 1);
        drop(second);
        assert_eq!(tracker.open(), 0);
    }
}
