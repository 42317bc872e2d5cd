//! Ingestion gateway: the single entry point for new events.
//!
//! `submit` decodes a raw payload, appends the event to the store and then
//! queues it for dispatch. The caller is acknowledged only after both steps,
//! and is suspended while the dispatch queue is full.
//!
//! Queue capacity is reserved *before* the event is stored. A closed queue
//! therefore rejects the event without touching the store, and once the
//! event is stored nothing can prevent it from being queued. A process crash
//! between the two steps still loses the event from the dispatch path; that
//! window is accepted since nothing here survives a crash anyway.

use crate::Event;
use crate::events::{DispatchError, DispatchQueue};
use crate::store::{EventStore, StoreEvent};
use eventgate_sdk::objects::DecodeError;
use kanau::processor::Processor;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Why a submission was not accepted.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The payload is not a well-formed event. Nothing was stored or queued.
    #[error("malformed event: {0}")]
    Decode(#[from] DecodeError),

    /// The pipeline is shutting down and no longer accepts events.
    #[error("event pipeline is closed")]
    Closed,
}

impl From<DispatchError> for SubmitError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Closed => Self::Closed,
        }
    }
}

/// Accepts events, stores them and queues them for notification.
///
/// Cheap to clone; clones share the same store and queue.
#[derive(Debug, Clone)]
pub struct IngestionGateway {
    store: Arc<EventStore>,
    queue: Arc<DispatchQueue>,
}

impl IngestionGateway {
    pub fn new(store: Arc<EventStore>, queue: Arc<DispatchQueue>) -> Self {
        Self { store, queue }
    }

    /// Decode a JSON payload and accept it.
    pub async fn submit(&self, raw: &[u8]) -> Result<(), SubmitError> {
        let event = Event::from_json(raw).inspect_err(|e| {
            debug!(error = %e, "Rejected malformed event");
        })?;
        self.submit_event(event).await
    }

    /// Accept an already decoded event.
    pub async fn submit_event(&self, event: Event) -> Result<(), SubmitError> {
        let slot = self.queue.reserve().await.inspect_err(|_| {
            warn!(
                session_id = %event.session_id,
                "Event submitted after the dispatch queue was closed"
            );
        })?;

        debug!(
            order_type = %event.order_type,
            session_id = %event.session_id,
            "Accepting event"
        );

        // Storing never suspends, so the slot cannot be dropped in between.
        self.store
            .process(StoreEvent {
                event: event.clone(),
            })
            .await
            .unwrap_or_else(|never| match never {});
        slot.send(event);

        Ok(())
    }
}
