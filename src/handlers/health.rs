use axum::response::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Body of `GET /health/status`. The process answering is all this checks;
/// storage reachability shows up in the storage metrics instead.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}
