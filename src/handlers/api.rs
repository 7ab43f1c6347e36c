use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::models::{AffectedResponse, PizzaEntity, RepositoryError, ServiceError};
use crate::observability::Metrics;
use crate::services::PizzaService;

type ApiError = (StatusCode, Json<Value>);

/// Shared state for the catalog endpoints
#[derive(Clone)]
pub struct ApiState {
    pub pizza_service: Arc<PizzaService>,
    pub metrics: Arc<Metrics>,
}

/// List every pizza in the catalog
#[instrument(name = "list_pizzas", skip(state))]
pub async fn list_pizzas(
    State(state): State<ApiState>,
) -> Result<Json<Vec<PizzaEntity>>, ApiError> {
    match state.pizza_service.list_all().await {
        Ok(pizzas) => {
            state.metrics.record_pizza_operation("list", "success");
            Ok(Json(pizzas))
        }
        Err(err) => {
            error!("Failed to list pizzas: {}", err);
            state.metrics.record_pizza_operation("list", "error");
            Err(service_error_to_response(err))
        }
    }
}

/// Get a specific pizza by ID
#[instrument(name = "get_pizza", skip(state), fields(pizza_id = %pizza_id))]
pub async fn get_pizza(
    State(state): State<ApiState>,
    Path(pizza_id): Path<String>,
) -> Result<Json<PizzaEntity>, ApiError> {
    let id = parse_pizza_id(&pizza_id)?;

    match state.pizza_service.get_by_id(id).await {
        Ok(Some(pizza)) => {
            state.metrics.record_pizza_operation("get", "success");
            Ok(Json(pizza))
        }
        Ok(None) => {
            state.metrics.record_pizza_operation("get", "not_found");
            Err(error_response(
                StatusCode::NOT_FOUND,
                "Pizza not found",
                format!("No pizza with ID {}", id),
            ))
        }
        Err(err) => {
            error!("Failed to get pizza: {}", err);
            state.metrics.record_pizza_operation("get", "error");
            Err(service_error_to_response(err))
        }
    }
}

/// Add a pizza; the response carries the stored entity with its ID
#[instrument(name = "add_pizza", skip(state, pizza), fields(name = %pizza.name))]
pub async fn add_pizza(
    State(state): State<ApiState>,
    Json(pizza): Json<PizzaEntity>,
) -> Result<(StatusCode, Json<PizzaEntity>), ApiError> {
    match state.pizza_service.add(pizza).await {
        Ok(created) => {
            info!("Pizza added");
            state.metrics.record_pizza_operation("add", "success");
            Ok((StatusCode::CREATED, Json(created)))
        }
        Err(err) => {
            state
                .metrics
                .record_pizza_operation("add", outcome_label(&err));
            Err(service_error_to_response(err))
        }
    }
}

/// Replace a pizza; the path ID wins over any ID in the body
#[instrument(name = "update_pizza", skip(state, pizza), fields(pizza_id = %pizza_id))]
pub async fn update_pizza(
    State(state): State<ApiState>,
    Path(pizza_id): Path<String>,
    Json(pizza): Json<PizzaEntity>,
) -> Result<Json<AffectedResponse>, ApiError> {
    let id = parse_pizza_id(&pizza_id)?;

    match state.pizza_service.update(pizza.with_id(id)).await {
        Ok(0) => {
            warn!("Update matched no pizza");
            state.metrics.record_pizza_operation("update", "not_found");
            Err(not_matched_response(id))
        }
        Ok(affected) => {
            state.metrics.record_pizza_operation("update", "success");
            Ok(Json(AffectedResponse { affected }))
        }
        Err(err) => {
            state
                .metrics
                .record_pizza_operation("update", outcome_label(&err));
            Err(service_error_to_response(err))
        }
    }
}

/// Delete a pizza by ID
#[instrument(name = "delete_pizza", skip(state), fields(pizza_id = %pizza_id))]
pub async fn delete_pizza(
    State(state): State<ApiState>,
    Path(pizza_id): Path<String>,
) -> Result<Json<AffectedResponse>, ApiError> {
    let id = parse_pizza_id(&pizza_id)?;

    match state.pizza_service.delete(id).await {
        Ok(0) => {
            state.metrics.record_pizza_operation("delete", "not_found");
            Err(not_matched_response(id))
        }
        Ok(affected) => {
            state.metrics.record_pizza_operation("delete", "success");
            Ok(Json(AffectedResponse { affected }))
        }
        Err(err) => {
            error!("Failed to delete pizza: {}", err);
            state.metrics.record_pizza_operation("delete", "error");
            Err(service_error_to_response(err))
        }
    }
}

fn parse_pizza_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            "Invalid pizza ID",
            format!("'{}' is not a valid UUID", raw),
        )
    })
}

fn outcome_label(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Validation { .. } => "invalid",
        ServiceError::Repository { .. } => "error",
    }
}

/// 404 that still reports the affected count so clients can recover it
fn not_matched_response(id: Uuid) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "affected": 0,
            "error": "Pizza not found",
            "message": format!("No pizza with ID {}", id),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

fn error_response(status: StatusCode, error: &str, message: String) -> ApiError {
    (
        status,
        Json(json!({
            "error": error,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// Map service errors onto HTTP status codes
pub(crate) fn service_error_to_response(err: ServiceError) -> ApiError {
    let (status, error) = match &err {
        ServiceError::Validation { .. } => (StatusCode::BAD_REQUEST, "Validation failed"),
        ServiceError::Repository { source } => match source {
            RepositoryError::ConstraintViolation { .. } => {
                (StatusCode::CONFLICT, "Constraint violation")
            }
            RepositoryError::ConnectionFailed => {
                (StatusCode::SERVICE_UNAVAILABLE, "Storage unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
        },
    };

    let message = match &err {
        ServiceError::Validation { message } => message.clone(),
        ServiceError::Repository { .. } if status == StatusCode::CONFLICT => err.to_string(),
        ServiceError::Repository { .. } => "The pizza store could not complete the request".to_string(),
    };

    error_response(status, error, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryPizzaRepository;
    use crate::services::DefaultPizzaValidator;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_app() -> Router {
        let state = ApiState {
            pizza_service: Arc::new(PizzaService::new(
                Arc::new(DefaultPizzaValidator::new()),
                Arc::new(InMemoryPizzaRepository::new()),
            )),
            metrics: Arc::new(Metrics::new().unwrap()),
        };

        Router::new()
            .route("/api/pizzas", get(list_pizzas).post(add_pizza))
            .route(
                "/api/pizzas/:pizza_id",
                get(get_pizza).put(update_pizza).delete(delete_pizza),
            )
            .with_state(state)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_add_returns_created_with_id() {
        let response = test_app()
            .oneshot(json_request(
                Method::POST,
                "/api/pizzas",
                json!({"name": "Margherita", "size": "large"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body["id"].is_string());
        assert_eq!(body["size"], "large");
    }

    #[tokio::test]
    async fn test_add_invalid_pizza_is_bad_request() {
        let response = test_app()
            .oneshot(json_request(Method::POST, "/api/pizzas", json!({"name": ""})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Validation failed");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("pizza_name"));
    }

    #[tokio::test]
    async fn test_update_unknown_pizza_reports_zero_affected() {
        let uri = format!("/api/pizzas/{}", Uuid::new_v4());
        let response = test_app()
            .oneshot(json_request(Method::PUT, &uri, json!({"name": "Ghost"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["affected"], 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_pizza_reports_zero_affected() {
        let uri = format!("/api/pizzas/{}", Uuid::new_v4());
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["affected"], 0);
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let request = Request::builder()
            .uri("/api/pizzas/not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Invalid pizza ID");
    }

    #[test]
    fn test_service_error_status_mapping() {
        let (status, _) = service_error_to_response(ServiceError::Validation {
            message: "bad".to_string(),
        });
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = service_error_to_response(ServiceError::from(
            RepositoryError::ConstraintViolation {
                message: "duplicate id".to_string(),
            },
        ));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) =
            service_error_to_response(ServiceError::from(RepositoryError::ConnectionFailed));
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["timestamp"].is_string());
    }
}
