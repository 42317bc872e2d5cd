//! Append-only event store.
//!
//! Every accepted event is appended here before it is queued for dispatch.
//! The store lives for the whole process and never evicts anything.
//!
//! Access goes through `Processor` commands (`StoreEvent`, `SnapshotEvents`,
//! `CountEvents`) so that a persistent backend can be dropped in behind the
//! same command types.

use crate::Event;
use kanau::processor::Processor;
use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory, append-only log of accepted events.
///
/// A single lock guards both appends and reads, so a snapshot never observes
/// a half-written entry and every append lands at exactly one position.
#[derive(Debug, Default)]
pub struct EventStore {
    events: Mutex<Vec<Event>>,
}

impl EventStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Never fails and never suspends.
    pub fn append(&self, event: Event) {
        self.lock().push(event);
    }

    /// Copy of every stored event, in append order.
    pub fn snapshot(&self) -> Vec<Event> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the Vec half-pushed, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Append one accepted event.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    pub event: Event,
}

/// Read back every stored event in append order.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotEvents;

/// Count the stored events.
#[derive(Debug, Clone, Copy)]
pub struct CountEvents;

impl Processor<StoreEvent> for EventStore {
    type Output = ();
    type Error = Infallible;
    #[tracing::instrument(skip_all, name = "Store:StoreEvent")]
    async fn process(&self, command: StoreEvent) -> Result<(), Infallible> {
        self.append(command.event);
        Ok(())
    }
}

impl Processor<SnapshotEvents> for EventStore {
    type Output = Vec<Event>;
    type Error = Infallible;
    async fn process(&self, _query: SnapshotEvents) -> Result<Vec<Event>, Infallible> {
        Ok(self.snapshot())
    }
}

impl Processor<CountEvents> for EventStore {
    type Output = usize;
    type Error = Infallible;
    async fn process(&self, _query: CountEvents) -> Result<usize, Infallible> {
        Ok(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn event(order_type: &str, session_id: &str) -> Event {
        Event {
            order_type: order_type.to_string(),
            session_id: session_id.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = EventStore::new();
        assert!(store.is_empty());

        store.process(StoreEvent { event: event("Purchase", "a") }).await.unwrap();
        store.process(StoreEvent { event: event("CardVerify", "b") }).await.unwrap();
        store.process(StoreEvent { event: event("SendOtp", "c") }).await.unwrap();

        let snapshot = store.process(SnapshotEvents).await.unwrap();
        let types: Vec<_> = snapshot.iter().map(|e| e.order_type.as_str()).collect();
        assert_eq!(types, ["Purchase", "CardVerify", "SendOtp"]);
        assert_eq!(store.process(CountEvents).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_are_kept() {
        let store = EventStore::new();
        store.append(event("Purchase", "a"));
        store.append(event("Purchase", "a"));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let store = EventStore::new();
        store.append(event("Purchase", "a"));
        let snapshot = store.snapshot();
        store.append(event("Purchase", "b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_each_land_once() {
        let store = Arc::new(EventStore::new());
        let mut handles = Vec::new();
        for producer in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    store.append(event("Purchase", &format!("{producer}-{i}")));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 800);

        // Each producer's own events keep their relative order.
        for producer in 0..8 {
            let prefix = format!("{producer}-");
            let own: Vec<_> = snapshot
                .iter()
                .filter(|e| e.session_id.starts_with(&prefix))
                .map(|e| e.session_id.clone())
                .collect();
            let expected: Vec<_> = (0..100).map(|i| format!("{producer}-{i}")).collect();
            assert_eq!(own, expected);
        }
    }
}
