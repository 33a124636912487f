use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info};

/// Headers that never reach the log.
const REDACTED_HEADERS: [&str; 2] = ["authorization", "cookie"];

/// Log every request line, its headers at debug level, and the outcome.
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    info!("Incoming request: {} {}", method, uri);

    for (name, value) in req.headers() {
        if REDACTED_HEADERS.contains(&name.as_str()) {
            continue;
        }
        match value.to_str() {
            Ok(value_str) => debug!("Header: {}: {}", name, value_str),
            Err(_) => debug!("Header: {}: (binary data)", name),
        }
    }

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();
    info!(
        "Response status for {} {}: {} ({} ms)",
        method, uri, status, elapsed_ms
    );

    if status.is_client_error() || status.is_server_error() {
        error!("Error response for {} {}: {}", method, uri, status);
    }

    response
}
