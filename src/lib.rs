pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod services;
pub mod ui;

pub use config::{Config, ConfigError};
pub use observability::{init_observability, shutdown_observability, Metrics};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use config::ServerConfig;
use handlers::{
    admin, api, cors_layer, health_check, metrics_handler, request_validation_middleware,
    security_headers_middleware,
};
use observability::observability_middleware;
use services::PizzaService;

/// Build the application router with all endpoints and middleware layers
pub fn create_app(
    metrics: Arc<Metrics>,
    pizza_service: Arc<PizzaService>,
    server: &ServerConfig,
) -> Router {
    let metrics_for_middleware = metrics.clone();

    let api_state = api::ApiState {
        pizza_service: pizza_service.clone(),
        metrics: metrics.clone(),
    };

    let admin_state = admin::AdminState { pizza_service };

    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
        .route("/api/pizzas", get(api::list_pizzas).post(api::add_pizza))
        .route(
            "/api/pizzas/:pizza_id",
            get(api::get_pizza)
                .put(api::update_pizza)
                .delete(api::delete_pizza),
        )
        .with_state(api_state)
        .route("/api/admin/seed", post(admin::seed_catalog))
        .with_state(admin_state)
        // The last layer added sees the request first
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(cors_layer())
        .layer(middleware::from_fn(request_validation_middleware))
        .layer(RequestBodyLimitLayer::new(server.max_request_size))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(middleware::from_fn(move |req, next| {
            observability_middleware(metrics_for_middleware.clone(), req, next)
        }))
}
