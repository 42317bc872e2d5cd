use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Number of events held by the event store.
    pub stored: usize,
    /// Number of events waiting in the dispatch queue.
    pub queued: usize,
}
