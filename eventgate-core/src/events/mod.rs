//! Event transport between ingestion and notification.
//!
//! # Event Flow
//!
//! 1. `IngestionGateway` decodes a submission and stores it
//! 2. The event is pushed into the `DispatchQueue`
//! 3. `WorkerPool` workers pull events and hand them to a `NotificationSink`

pub mod dispatch_queue;

pub use dispatch_queue::{DispatchError, DispatchQueue, DispatchSlot};
