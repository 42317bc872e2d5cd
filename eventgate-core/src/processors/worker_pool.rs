//! WorkerPool processor.
//!
//! The WorkerPool is responsible for:
//! - Spawning a fixed number of workers over a shared `DispatchQueue`
//! - Handing each dequeued event to the `NotificationSink`
//! - Containing sink failures (errors and panics) to the event at hand
//! - On stop: closing the queue, letting workers drain it, and joining them
//!
//! Stopping has no timeout. Every event that made it into the queue is
//! delivered before `stop` returns.

use super::sink::NotificationSink;
use crate::Event;
use crate::events::DispatchQueue;
use futures_util::FutureExt;
use std::num::NonZeroUsize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Outcome of a completed [`WorkerPool::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolReport {
    /// Number of workers that were joined.
    pub workers: usize,
    /// Events the sink accepted.
    pub delivered: u64,
    /// Events the sink failed on (error or panic).
    pub failed: u64,
}

impl PoolReport {
    /// Total number of events handed to the sink.
    pub fn processed(&self) -> u64 {
        self.delivered + self.failed
    }
}

#[derive(Debug, Default)]
struct PoolStats {
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Fixed set of workers draining a [`DispatchQueue`].
///
/// Producers must stop enqueueing before [`stop`](WorkerPool::stop) is
/// called. `stop` consumes the pool, so it can only run once.
pub struct WorkerPool {
    queue: Arc<DispatchQueue>,
    workers: Vec<JoinHandle<()>>,
    stats: Arc<PoolStats>,
}

impl WorkerPool {
    /// Spawn `workers` worker tasks on the current tokio runtime.
    pub fn start(
        workers: NonZeroUsize,
        queue: Arc<DispatchQueue>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        let stats = Arc::new(PoolStats::default());
        let handles = (0..workers.get())
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    queue.clone(),
                    sink.clone(),
                    stats.clone(),
                ))
            })
            .collect();

        info!(workers = workers.get(), sink = sink.name(), "WorkerPool started");

        Self {
            queue,
            workers: handles,
            stats,
        }
    }

    /// Number of spawned workers.
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Close the queue and wait until every worker has drained it and exited.
    pub async fn stop(self) -> PoolReport {
        info!(pending = self.queue.len(), "Stopping WorkerPool");
        self.queue.close().await;

        let workers = self.workers.len();
        for (id, handle) in self.workers.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!(worker = id, error = %e, "Worker task ended abnormally");
            }
        }

        let report = PoolReport {
            workers,
            delivered: self.stats.delivered.load(Ordering::Relaxed),
            failed: self.stats.failed.load(Ordering::Relaxed),
        };
        info!(
            workers = report.workers,
            delivered = report.delivered,
            failed = report.failed,
            "WorkerPool shutdown complete"
        );
        report
    }
}

async fn run_worker(
    id: usize,
    queue: Arc<DispatchQueue>,
    sink: Arc<dyn NotificationSink>,
    stats: Arc<PoolStats>,
) {
    debug!(worker = id, "Worker started");

    while let Some(event) = queue.dequeue().await {
        if deliver(id, sink.as_ref(), &event).await {
            stats.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            stats.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    debug!(worker = id, "Queue closed and drained, worker exiting");
}

/// Hand one event to the sink. Returns whether the sink accepted it.
async fn deliver(id: usize, sink: &dyn NotificationSink, event: &Event) -> bool {
    match AssertUnwindSafe(sink.notify(event)).catch_unwind().await {
        Ok(Ok(())) => {
            debug!(worker = id, session_id = %event.session_id, "Event delivered");
            true
        }
        Ok(Err(e)) => {
            error!(
                worker = id,
                sink = sink.name(),
                session_id = %event.session_id,
                order_type = %event.order_type,
                error = %e,
                "Failed to notify event"
            );
            false
        }
        Err(_) => {
            error!(
                worker = id,
                sink = sink.name(),
                session_id = %event.session_id,
                order_type = %event.order_type,
                "Notification sink panicked"
            );
            false
        }
    }
}
