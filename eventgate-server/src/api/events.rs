use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use eventgate_core::gateway::SubmitError;
use eventgate_core::store::SnapshotEvents;
use eventgate_sdk::objects::{DecodeError, Event};
use kanau::processor::Processor;

use crate::state::AppState;

/// `POST /` and `POST /events` — accept one event.
///
/// Answers `201 Created` once the event is stored and queued. Waits while the
/// dispatch queue is full.
pub(super) async fn submit_event(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<StatusCode, IngestApiError> {
    state.gateway.submit(&body).await?;
    Ok(StatusCode::CREATED)
}

/// `GET /events` — every stored event, in the order it was accepted.
pub(super) async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    let events = state
        .store
        .process(SnapshotEvents)
        .await
        .unwrap_or_else(|never| match never {});
    Json(events)
}

/// Errors that can occur in ingestion handlers.
#[derive(Debug)]
pub(super) enum IngestApiError {
    /// The body is not a well-formed event.
    Malformed(DecodeError),
    /// The pipeline no longer accepts events.
    ShuttingDown,
}

impl From<SubmitError> for IngestApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Decode(e) => Self::Malformed(e),
            SubmitError::Closed => Self::ShuttingDown,
        }
    }
}

impl IntoResponse for IngestApiError {
    fn into_response(self) -> Response {
        match self {
            IngestApiError::Malformed(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            IngestApiError::ShuttingDown => {
                tracing::error!("Event submitted after the pipeline stopped accepting");
                (StatusCode::SERVICE_UNAVAILABLE, "server is shutting down").into_response()
            }
        }
    }
}
