//! Access logging middleware.
//!
//! Tags each request with a fresh id (echoed back as `X-Request-Id`) and
//! logs method, path, status and latency once the handler completes.

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::api::types::REQUEST_ID_HEADER;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = Uuid::new_v4().to_string();

    let started = Instant::now();
    let mut response = next.run(req).await;
    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        tracing::warn!(%request_id, %method, path, status, latency_ms, "API request failed");
    } else {
        tracing::info!(%request_id, %method, path, status, latency_ms, "API request");
    }

    if let Ok(val) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
