//! Bounded, closeable dispatch queue.
//!
//! Carries accepted events from the ingestion gateway to the worker pool.
//! Built on a bounded `tokio::sync::mpsc` channel:
//!
//! - Producers clone the queue's sender for the duration of one enqueue, so
//!   a producer already waiting for capacity keeps the channel open until its
//!   event is in.
//! - Closing drops the master sender. New enqueues fail with
//!   [`DispatchError::Closed`]; once every in-flight producer has finished
//!   the receiver reports exhaustion and workers exit.
//! - Workers share the receiver behind an async mutex, so each event is
//!   handed to exactly one worker.

use crate::Event;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock, mpsc};
use tracing::{debug, info};

/// Errors returned by [`DispatchQueue`] producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The queue was closed. Enqueueing after close breaks the shutdown
    /// ordering contract: the transport must stop before the workers do.
    #[error("dispatch queue is closed")]
    Closed,
}

/// Bounded multi-producer, multi-consumer FIFO of pending events.
#[derive(Debug)]
pub struct DispatchQueue {
    sender: RwLock<Option<mpsc::Sender<Event>>>,
    receiver: Mutex<mpsc::Receiver<Event>>,
    capacity: NonZeroUsize,
    pending: AtomicUsize,
}

/// Capacity reserved in a [`DispatchQueue`].
///
/// Obtained from [`DispatchQueue::reserve`]; sending through it cannot fail
/// and cannot block. Dropping it unused gives the capacity back.
#[derive(Debug)]
pub struct DispatchSlot<'a> {
    permit: mpsc::OwnedPermit<Event>,
    pending: &'a AtomicUsize,
}

impl DispatchQueue {
    /// Create an open queue holding at most `capacity` events.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.get());
        Self {
            sender: RwLock::new(Some(sender)),
            receiver: Mutex::new(receiver),
            capacity,
            pending: AtomicUsize::new(0),
        }
    }

    /// Add an event, waiting for capacity if the queue is full.
    pub async fn enqueue(&self, event: Event) -> Result<(), DispatchError> {
        self.reserve().await?.send(event);
        Ok(())
    }

    /// Wait until the queue has room for one more event and reserve it.
    ///
    /// Fails immediately if the queue is already closed. A caller that is
    /// waiting here when the queue closes still gets its slot once workers
    /// free capacity.
    pub async fn reserve(&self) -> Result<DispatchSlot<'_>, DispatchError> {
        let sender = self
            .sender
            .read()
            .await
            .clone()
            .ok_or(DispatchError::Closed)?;
        let permit = sender
            .reserve_owned()
            .await
            .map_err(|_| DispatchError::Closed)?;
        Ok(DispatchSlot {
            permit,
            pending: &self.pending,
        })
    }

    /// Take the next event in FIFO order.
    ///
    /// Waits while the queue is empty and open. Returns `None` once the queue
    /// is closed and fully drained.
    pub async fn dequeue(&self) -> Option<Event> {
        let event = self.receiver.lock().await.recv().await;
        if event.is_some() {
            self.pending.fetch_sub(1, Ordering::Relaxed);
        }
        event
    }

    /// Close the queue for producers.
    ///
    /// Events already queued stay drainable. Returns `true` if this call
    /// closed the queue, `false` if it was closed before.
    pub async fn close(&self) -> bool {
        let closed = self.sender.write().await.take().is_some();
        if closed {
            info!(pending = self.len(), "Dispatch queue closed");
        } else {
            debug!("Dispatch queue already closed");
        }
        closed
    }

    pub async fn is_closed(&self) -> bool {
        self.sender.read().await.is_none()
    }

    /// Number of events waiting to be dequeued.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

impl DispatchSlot<'_> {
    /// Put the event into the reserved slot.
    pub fn send(self, event: Event) {
        self.pending.fetch_add(1, Ordering::Relaxed);
        self.permit.send(event);
    }
}
