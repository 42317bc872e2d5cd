//! Ingestion API client (event producer → eventgate server).

use reqwest::{Client, StatusCode};
use url::Url;

use super::ClientError;
use crate::objects::{Event, HealthResponse};

/// Typed HTTP client for submitting events to an eventgate server.
#[derive(Debug, Clone)]
pub struct EventClient {
    http: Client,
    base_url: Url,
}

impl EventClient {
    /// Create a new `EventClient`.
    ///
    /// * `base_url` – root URL of the eventgate server (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST /events` – submit one event.
    ///
    /// Resolves once the server has stored and queued the event. The server
    /// applies backpressure, so this may take a while when its dispatch queue
    /// is full.
    pub async fn submit(&self, event: &Event) -> Result<(), ClientError> {
        let url = self.base_url.join("/events")?;
        let body = serde_json::to_vec(event)?;

        let resp = self
            .http
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(())
    }

    /// `GET /events` – fetch every event the server has stored so far.
    pub async fn stored_events(&self) -> Result<Vec<Event>, ClientError> {
        let url = self.base_url.join("/events")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }

    /// `GET /health` – server liveness and pipeline depth.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.base_url.join("/health")?;
        let resp = self.http.get(url).send().await?;
        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
