//! Request logging middleware.

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a finished request is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The caller's fault: bad input, a taken email, an unknown route.
    Rejected,
    Failed,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        if status.is_server_error() {
            Outcome::Failed
        } else if status.is_client_error() {
            Outcome::Rejected
        } else {
            Outcome::Completed
        }
    }
}

/// Log method, path, status and latency for every request.
///
/// Client errors are expected during signup (duplicate emails, malformed
/// input) and are logged at `info`; only server errors reach `warn`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    debug!(%method, %path, "Request started");

    let response = next.run(request).await;

    let latency_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    match Outcome::from_status(status) {
        Outcome::Completed => debug!(%method, %path, %status, latency_ms, "Request completed"),
        Outcome::Rejected => info!(%method, %path, %status, latency_ms, "Request rejected"),
        Outcome::Failed => warn!(%method, %path, %status, latency_ms, "Request failed"),
    }

    response
}
