use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::{future::Future, sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::Metrics;

/// Per-request span, in-flight gauge and request metrics
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // Route templates keep label cardinality bounded
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let span_name = format!("{} {}", method, endpoint);
    let span = tracing::info_span!(
        target: "pizza_admin::http",
        "{}", span_name,
        otel.name = %span_name,
        otel.kind = "server",
        http.method = %method,
        http.route = %endpoint,
        http.url = %uri,
        http.user_agent = %user_agent,
        http.response.status_code = tracing::field::Empty,
        http.response_time_ms = tracing::field::Empty,
    );

    async {
        metrics.increment_in_flight(&method, &endpoint);

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let duration_ms = duration.as_millis();
        let status_code = response.status().as_u16();

        let current_span = tracing::Span::current();
        current_span.record("http.response.status_code", status_code);
        current_span.record("http.response_time_ms", duration_ms);

        let otel_context = current_span.context();
        if status_code >= 500 {
            otel_context
                .span()
                .set_status(opentelemetry::trace::Status::error("HTTP server error"));
        } else {
            otel_context
                .span()
                .set_status(opentelemetry::trace::Status::Ok);
        }

        metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
        metrics.decrement_in_flight(&method, &endpoint);

        if status_code >= 500 {
            error!(
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request failed"
            );
        } else if status_code >= 400 {
            warn!(
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request rejected"
            );
        } else {
            info!(
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request completed"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Times storage calls and records them as database metrics
#[derive(Clone)]
pub struct StorageTracer {
    metrics: Arc<Metrics>,
    table: String,
}

impl StorageTracer {
    pub fn new(metrics: Arc<Metrics>, table: impl Into<String>) -> Self {
        Self {
            metrics,
            table: table.into(),
        }
    }

    #[instrument(skip_all, fields(operation = %operation, table = %self.table))]
    pub async fn trace_operation<F, T, E>(&self, operation: &str, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let start_time = Instant::now();
        let result = future.await;
        let duration = start_time.elapsed();

        self.metrics.record_database_operation(
            operation,
            &self.table,
            result.is_ok(),
            duration.as_secs_f64(),
        );

        if let Err(error) = &result {
            error!(
                error = %error,
                duration_ms = duration.as_millis(),
                "Storage operation failed"
            );
        }

        result
    }
}
