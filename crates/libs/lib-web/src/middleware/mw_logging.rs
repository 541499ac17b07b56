//! # Request/Response Logging Middleware
//!
//! Logs method, path, status, and duration for every HTTP request,
//! correlated by the request ID from [`mw_req_stamp`](super::mw_req_stamp).
//! Authorization material is never logged.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Request/response logging middleware
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .extensions()
        .get::<super::mw_req_stamp::RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let res = next.run(req).await;

    let status = res.status();
    let latency_ms = start.elapsed().as_millis();

    if status.is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms,
            "[HTTP] request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            path = %path,
            status = %status.as_u16(),
            latency_ms,
            "[HTTP] request"
        );
    }

    res
}
