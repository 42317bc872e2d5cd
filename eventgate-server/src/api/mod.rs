//! Ingestion API.
//!
//! # Endpoints
//!
//! - `POST /`        – submit one event
//! - `POST /events`  – submit one event
//! - `GET  /events`  – list every stored event

use axum::{
    Router,
    routing::post,
};

use crate::state::AppState;

mod events;

/// Build the ingestion API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(events::submit_event))
        .route(
            "/events",
            post(events::submit_event).get(events::list_events),
        )
}
