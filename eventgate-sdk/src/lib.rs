//! Shared types for the eventgate ingestion server.
//!
//! The [`objects`] module holds everything that crosses the wire. The typed
//! HTTP client lives in [`client`] behind the `client` cargo feature.

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
