//! Notification sinks.
//!
//! A sink is invoked once per accepted event by whichever worker dequeued it.
//! Several workers call the same sink concurrently, hence `Send + Sync`.

use crate::Event;
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// Errors a sink may report for a single event.
///
/// A failure only affects the event at hand; the worker logs it and moves on.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The downstream target rejected or could not receive the notification.
    #[error("notification failed: {0}")]
    Failed(String),
}

/// Receives every accepted event exactly once.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn notify(&self, event: &Event) -> Result<(), NotifyError>;
}

/// Sink that writes one structured log record per event.
#[derive(Debug, Clone)]
pub struct LogSink {
    prefix: String,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            prefix: "event".to_string(),
        }
    }

    /// Use a custom prefix to tell several log sinks apart (e.g. "audit").
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, event: &Event) -> Result<(), NotifyError> {
        info!(
            prefix = %self.prefix,
            order_type = %event.order_type,
            session_id = %event.session_id,
            card = %event.card,
            event_date = %event.event_date,
            website_url = %event.website_url,
            "[{}] {}",
            self.prefix,
            event.order_type
        );
        Ok(())
    }
}
