//! Process-wide pipeline context.
//!
//! Built once at process entry and handed to whatever needs it; there is no
//! global instance.

use crate::config::PipelineConfig;
use crate::events::DispatchQueue;
use crate::gateway::IngestionGateway;
use crate::processors::{NotificationSink, PoolReport, WorkerPool};
use crate::store::EventStore;
use std::sync::Arc;
use tracing::info;

/// Store, queue, gateway and running worker pool, wired together.
pub struct Pipeline {
    store: Arc<EventStore>,
    queue: Arc<DispatchQueue>,
    gateway: IngestionGateway,
    pool: WorkerPool,
}

impl Pipeline {
    /// Build the pipeline and start its workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(config: &PipelineConfig, sink: Arc<dyn NotificationSink>) -> Self {
        let store = Arc::new(EventStore::new());
        let queue = Arc::new(DispatchQueue::new(config.queue_capacity));
        let gateway = IngestionGateway::new(store.clone(), queue.clone());
        let pool = WorkerPool::start(config.workers, queue.clone(), sink);

        info!(
            queue_capacity = config.queue_capacity.get(),
            workers = config.workers.get(),
            "Event pipeline started"
        );

        Self {
            store,
            queue,
            gateway,
            pool,
        }
    }

    pub fn gateway(&self) -> IngestionGateway {
        self.gateway.clone()
    }

    pub fn store(&self) -> Arc<EventStore> {
        self.store.clone()
    }

    pub fn queue(&self) -> Arc<DispatchQueue> {
        self.queue.clone()
    }

    /// Stop the workers after draining every queued event.
    ///
    /// Whatever feeds the gateway must already have stopped. Submissions that
    /// race with this call are rejected with `SubmitError::Closed`.
    pub async fn stop(self) -> PoolReport {
        self.pool.stop().await
    }
}
