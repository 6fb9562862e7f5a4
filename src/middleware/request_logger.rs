use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use uuid::Uuid;

/// Tags each request with an `x-request-id` and logs method, path, status
/// and latency. The id is echoed on the response for cross-referencing with
/// the delivery collaborator's own logs.
pub async fn request_logger_middleware(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    if let Ok(header_value) = request_id.parse() {
        req.headers_mut().insert("x-request-id", header_value);
    }

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let response = next.run(req).await;

    let latency = start.elapsed();
    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %response.status().as_u16(),
        latency_ms = latency.as_millis(),
        "Outgoing response"
    );

    let (mut parts, body) = response.into_parts();
    if let Ok(header_value) = request_id.parse() {
        parts.headers.insert("x-request-id", header_value);
    }
    Response::from_parts(parts, body)
}
