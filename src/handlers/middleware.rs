use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{Json, Response},
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Rejects bodies that are not JSON on write requests
pub async fn request_validation_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<Value>)> {
    validate_content_type(&request)?;

    Ok(next.run(request).await)
}

fn has_body(request: &Request<Body>) -> bool {
    match request.headers().get(header::CONTENT_LENGTH) {
        Some(length) => length
            .to_str()
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|n| n > 0)
            .unwrap_or(true),
        None => request.headers().contains_key(header::CONTENT_TYPE),
    }
}

fn validate_content_type(request: &Request<Body>) -> Result<(), (StatusCode, Json<Value>)> {
    let method = request.method();

    if !(method == Method::POST || method == Method::PUT || method == Method::PATCH) {
        return Ok(());
    }

    // Body-less commands such as the seed endpoint are allowed through
    if !has_body(request) {
        return Ok(());
    }

    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        return Ok(());
    }

    warn!("Invalid content type: {:?}", content_type);
    Err((
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Json(json!({
            "error": "Unsupported media type",
            "message": "Content-Type must be application/json",
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    ))
}

/// CORS for the browser-hosted admin page; preflights are answered here
/// before routing
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86400))
}

/// Security headers middleware
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'self'"),
    );

    response
}
