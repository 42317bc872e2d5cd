//! Axum server setup and router configuration.

use crate::api;
use crate::state::AppState;
use axum::{Json, Router, extract::State, routing::get};
use eventgate_core::store::CountEvents;
use eventgate_sdk::objects::HealthResponse;
use kanau::processor::Processor;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;

/// Build the main application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .merge(api::router())
        .layer(TraceLayer::new_for_http())
        // Add state to all routes
        .with_state(state)
}

/// Simple health check - returns OK if the server is running.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let stored = state
        .store
        .process(CountEvents)
        .await
        .unwrap_or_else(|never| match never {});
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        stored,
        queued: state.queue.len(),
    })
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn run_server<F>(
    router: Router,
    addr: SocketAddr,
    grace: Duration,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send,
{
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);
    serve(listener, router, grace, shutdown).await
}

/// Serve on an already bound listener with graceful shutdown support.
///
/// Once `shutdown` resolves the listener stops accepting connections and
/// in-flight requests get `grace` to finish. After that the server task is
/// aborted and a warning is logged. Either way this returns only after the
/// transport has stopped taking new requests, so the caller may proceed to
/// drain the workers.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    grace: Duration,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send,
{
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => return flatten(result),
        _ = shutdown => {}
    }

    let _ = stop_tx.send(true);

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            tracing::info!("Server stopped");
            flatten(result)
        }
        Err(_) => {
            tracing::warn!(
                grace_ms = grace.as_millis() as u64,
                "In-flight requests did not finish within the shutdown grace period, aborting server"
            );
            server.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<Result<(), std::io::Error>, JoinError>) -> Result<(), std::io::Error> {
    result.map_err(std::io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventgate_core::config::PipelineConfig;
    use eventgate_core::pipeline::Pipeline;
    use eventgate_core::processors::LogSink;
    use eventgate_sdk::client::EventClient;
    use eventgate_sdk::objects::Event;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    async fn bind() -> (TcpListener, url::Url) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let url = url::Url::parse(&format!("http://{addr}")).unwrap();
        (listener, url)
    }

    fn sample_events() -> Vec<Event> {
        ["Purchase", "CardVerify", "SendOtp"]
            .into_iter()
            .enumerate()
            .map(|(i, order_type)| Event {
                order_type: order_type.to_string(),
                session_id: format!("session-{i}"),
                card: "4433**1409".to_string(),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shutdown_sequence_keeps_every_accepted_event() {
        let pipeline = Pipeline::start(&PipelineConfig::default(), Arc::new(LogSink::new()));
        let store = pipeline.store();
        let (listener, url) = bind().await;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            build_router(AppState::new(&pipeline)),
            Duration::from_secs(1),
            async move {
                let _ = stop_rx.await;
            },
        ));

        let client = EventClient::new(url);
        let expected = sample_events();
        let submissions: Vec<_> = expected
            .iter()
            .cloned()
            .map(|event| {
                let client = client.clone();
                tokio::spawn(async move { client.submit(&event).await })
            })
            .collect();
        for submission in submissions {
            submission.await.unwrap().unwrap();
        }

        let health = client.health().await.unwrap();
        assert_eq!(health.stored, 3);

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();

        let report = pipeline.stop().await;
        assert_eq!(report.delivered, 3);

        let stored: HashSet<_> = store.snapshot().into_iter().collect();
        let expected: HashSet<_> = expected.into_iter().collect();
        assert_eq!(stored, expected);
    }

    #[tokio::test]
    async fn test_slow_request_is_cut_off_after_grace() {
        let (listener, url) = bind().await;
        let router = Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "late"
            }),
        );
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve(
            listener,
            router,
            Duration::from_millis(100),
            async move {
                let _ = stop_rx.await;
            },
        ));

        let slow = tokio::spawn(reqwest::get(url.join("/slow").unwrap()));
        tokio::time::sleep(Duration::from_millis(100)).await;

        stop_tx.send(()).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server should give up after the grace period");
        assert!(result.unwrap().is_ok());
        slow.abort();
    }

    #[tokio::test]
    async fn test_idle_server_stops_on_signal() {
        let (listener, _url) = bind().await;
        let result = serve(
            listener,
            Router::new(),
            Duration::from_secs(1),
            std::future::ready(()),
        )
        .await;
        assert!(result.is_ok());
    }
}
