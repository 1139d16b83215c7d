//! Request deadline reporting.
//!
//! `TimeoutLayer` answers an expired request with a bare 408. This layer
//! sits just outside it and swaps that response for the JSON error body.

use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;

pub async fn report_timeout(req: Request<axum::body::Body>, next: Next) -> Response {
    let response = next.run(req).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}
