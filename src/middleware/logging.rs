//! Request/response logging middleware.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, Uri},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};

/// How a finished request gets reported
pub trait Logger {
    /// Log one finished request
    fn log(method: &Method, uri: &Uri, status: StatusCode, latency: Duration);
}

/// Logs every request at `info`, failures at `warn`/`error`.
#[derive(Debug)]
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(method: &Method, uri: &Uri, status: StatusCode, latency: Duration) {
        let latency_ms = latency.as_millis() as u64;

        if status.is_server_error() {
            tracing::error!(%method, %uri, %status, latency_ms, "request failed");
        } else if status.is_client_error() {
            tracing::warn!(%method, %uri, %status, latency_ms, "request rejected");
        } else {
            tracing::info!(%method, %uri, %status, latency_ms, "request finished");
        }
    }
}

/// Logs at `debug` only, for noisy routes such as probes.
#[derive(Debug)]
pub struct DebugOnlyLogger;

impl Logger for DebugOnlyLogger {
    fn log(method: &Method, uri: &Uri, status: StatusCode, latency: Duration) {
        tracing::debug!(
            %method,
            %uri,
            %status,
            latency_ms = latency.as_millis() as u64,
            "request finished"
        );
    }
}

/// Middleware that times the inner service and hands the outcome to `L`.
pub async fn log_request_response<L: Logger>(
    request: Request<Body>,
    next: Next<Body>,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    L::log(&method, &uri, response.status(), start.elapsed());

    response
}
