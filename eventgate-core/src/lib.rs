#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

//! Concurrency core of the eventgate ingestion server.
//!
//! Accepted events flow `IngestionGateway` -> `EventStore` -> `DispatchQueue`
//! -> `WorkerPool` -> `NotificationSink`. Shutdown runs the other way: the
//! transport stops accepting, the queue is closed, and the pool drains
//! whatever is still queued before its workers exit.

pub mod config;
pub mod events;
pub mod gateway;
pub mod pipeline;
pub mod processors;
pub mod store;

pub use eventgate_sdk::objects::Event;
