use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use prometheus::TEXT_FORMAT;
use std::sync::Arc;
use tracing::error;

use crate::observability::Metrics;

// Scrapes are frequent; no span per request
pub async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> Response {
    metrics
        .encode()
        .map(|body| ([(header::CONTENT_TYPE, TEXT_FORMAT)], body).into_response())
        .unwrap_or_else(|e| {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        })
}
