//! TOML file configuration structures.
//!
//! These structs directly map to the `eventgate.toml` file format. Every
//! section and key is optional.

use eventgate_core::config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::num::NonZeroUsize;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// How long in-flight requests may run after a shutdown signal before
    /// the listener is torn down.
    #[serde(default = "default_shutdown_grace_ms")]
    pub shutdown_grace_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            shutdown_grace_ms: default_shutdown_grace_ms(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_shutdown_grace_ms() -> u64 {
    1000
}

/// Dispatch pipeline section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Events that may wait for a worker before submitters are suspended.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: NonZeroUsize,
    /// Number of notification workers.
    #[serde(default = "default_workers")]
    pub workers: NonZeroUsize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            workers: default_workers(),
        }
    }
}

fn default_queue_capacity() -> NonZeroUsize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_workers() -> NonZeroUsize {
    DEFAULT_WORKERS
}
