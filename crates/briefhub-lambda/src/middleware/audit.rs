use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Request logging middleware.
///
/// Logs every request as a structured event using `tracing`: method, path,
/// status and wall time. In Lambda these land in CloudWatch as JSON lines.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_server_error() {
        tracing::warn!(
            method = %method,
            path = %uri,
            status = status,
            elapsed_ms = elapsed_ms,
            "api_request"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %uri,
            status = status,
            elapsed_ms = elapsed_ms,
            "api_request"
        );
    }

    response
}
