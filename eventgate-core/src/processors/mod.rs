//! Event processors.
//!
//! - `WorkerPool`: drains the `DispatchQueue` and hands events to a sink
//! - `NotificationSink`: what a worker calls for each event; `LogSink` is the
//!   built-in implementation

pub mod sink;
pub mod worker_pool;

pub use sink::{LogSink, NotificationSink, NotifyError};
pub use worker_pool::{PoolReport, WorkerPool};
