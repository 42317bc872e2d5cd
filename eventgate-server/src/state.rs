//! Application state shared across all request handlers.

use eventgate_core::events::DispatchQueue;
use eventgate_core::gateway::IngestionGateway;
use eventgate_core::pipeline::Pipeline;
use eventgate_core::store::EventStore;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Entry point for new events.
    pub gateway: IngestionGateway,
    /// Read access to accepted events.
    pub store: Arc<EventStore>,
    /// Dispatch queue, for depth reporting.
    pub queue: Arc<DispatchQueue>,
}

impl AppState {
    /// Create a new AppState backed by a running pipeline.
    pub fn new(pipeline: &Pipeline) -> Self {
        Self {
            gateway: pipeline.gateway(),
            store: pipeline.store(),
            queue: pipeline.queue(),
        }
    }
}
