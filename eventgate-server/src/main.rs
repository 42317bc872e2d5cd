//! eventgate server
//!
//! Accepts tracked business events over HTTP, records them, and dispatches
//! each one to a notification sink through a bounded worker pool.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, ConfigOverrides};
use eventgate_core::pipeline::Pipeline;
use eventgate_core::processors::LogSink;
use server::{build_router, run_server};
use shutdown::shutdown_signal;
use state::AppState;
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// eventgate - event ingestion and notification server
#[derive(Parser, Debug)]
#[command(name = "eventgate-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (defaults to ./eventgate.toml if present)
    #[arg(short, long, env = "EVENTGATE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 0.0.0.0:8080)
    #[arg(short, long, env = "EVENTGATE_LISTEN")]
    listen: Option<SocketAddr>,

    /// Override the number of notification workers
    #[arg(short, long, env = "EVENTGATE_WORKERS")]
    workers: Option<NonZeroUsize>,

    /// Override the dispatch queue capacity
    #[arg(long, env = "EVENTGATE_QUEUE_CAPACITY")]
    queue_capacity: Option<NonZeroUsize>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen,
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting eventgate-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(args.config.clone(), args.overrides());
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    // Start the workers before the transport can accept anything
    let pipeline = Pipeline::start(&config.pipeline, Arc::new(LogSink::new()));

    let router = build_router(AppState::new(&pipeline));

    // Run the server until a shutdown signal arrives
    tracing::info!("Starting HTTP server on {}", config.server.listen);
    let result = run_server(
        router,
        config.server.listen,
        config.server.shutdown_grace,
        shutdown_signal(),
    )
    .await;
    if let Err(e) = &result {
        tracing::error!("Server failed: {}", e);
    }

    // The transport is down; drain whatever is still queued
    tracing::info!("Stopping workers...");
    let report = pipeline.stop().await;
    tracing::info!(
        delivered = report.delivered,
        failed = report.failed,
        "Graceful shutdown complete"
    );

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
