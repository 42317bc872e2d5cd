//! Pipeline sizing.
//!
//! Loading and overriding these values is handled by the server crate; the
//! core only needs the validated numbers.

use std::num::NonZeroUsize;

/// Default dispatch queue capacity. Large enough that producers rarely block
/// under normal load.
pub const DEFAULT_QUEUE_CAPACITY: NonZeroUsize = non_zero(100);

/// Default number of notification workers.
pub const DEFAULT_WORKERS: NonZeroUsize = non_zero(3);

/// Validated sizing of the dispatch pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum number of events waiting in the dispatch queue.
    pub queue_capacity: NonZeroUsize,
    /// Number of concurrent workers draining the queue.
    pub workers: NonZeroUsize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            workers: DEFAULT_WORKERS,
        }
    }
}

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    }
}
