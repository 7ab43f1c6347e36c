use pizza_admin::client::PizzaClient;
use pizza_admin::config::ServerConfig;
use pizza_admin::models::{PizzaEntity, PizzaSize};
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::*;

#[tokio::test]
async fn test_add_then_list_returns_single_pizza() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.pizza_client;

    let created = client
        .add_pizza(&PizzaEntity::new("Margherita"))
        .await
        .expect("Failed to add pizza");
    assert!(created.id.is_some());

    let pizzas = client.get_all_pizzas().await.expect("Failed to list pizzas");
    assert_eq!(pizzas.len(), 1);
    assert_eq!(pizzas[0].name, "Margherita");
    assert_eq!(pizzas[0].size, PizzaSize::Medium);
}

#[tokio::test]
async fn test_rename_keeps_count() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.pizza_client;

    let mut pizza = client
        .add_pizza(&PizzaEntity::new("Margherita").with_topping("Basil", dec!(0.50)))
        .await
        .unwrap();
    pizza.name = "Margherita DOP".to_string();

    assert_eq!(client.update_pizza(&pizza).await.unwrap(), 1);

    let pizzas = client.get_all_pizzas().await.unwrap();
    assert_eq!(pizzas.len(), 1);
    assert_eq!(pizzas[0].name, "Margherita DOP");
    assert_eq!(pizzas[0].toppings, pizza.toppings);

    let fetched = client.get_pizza(pizza.id.unwrap()).await.unwrap();
    assert_eq!(fetched, Some(pizza));
}

#[tokio::test]
async fn test_missing_pizza_mutations_report_zero() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.pizza_client;
    let ghost = PizzaEntity::new("Ghost").with_id(Uuid::new_v4());

    assert_eq!(client.update_pizza(&ghost).await.unwrap(), 0);
    assert_eq!(client.delete_pizza(ghost.id.unwrap()).await.unwrap(), 0);
    assert_eq!(client.get_pizza(ghost.id.unwrap()).await.unwrap(), None);
}

#[tokio::test]
async fn test_delete_removes_pizza() {
    let test_env = TestEnvironment::new().await;
    let client = &test_env.pizza_client;

    let created = client.add_pizza(&PizzaEntity::new("Diavola")).await.unwrap();
    let id = created.id.unwrap();

    assert_eq!(client.delete_pizza(id).await.unwrap(), 1);
    assert!(client.get_all_pizzas().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_failure_lists_every_message() {
    let test_env = TestEnvironment::new().await;

    let response = test_env
        .client
        .post(test_env.url("/api/pizzas"))
        .json(&json!({
            "name": "  ",
            "toppings": [
                {"name": "Olive", "price": "150"},
                {"name": "olive", "price": "1.00"}
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("pizza_name"));
    assert!(message.contains("topping_price"));
    assert!(message.contains("; "));

    // Nothing was stored
    let pizzas = test_env.pizza_client.get_all_pizzas().await.unwrap();
    assert!(pizzas.is_empty());
}

#[tokio::test]
async fn test_client_surfaces_validation_error() {
    let test_env = TestEnvironment::new().await;

    let err = test_env
        .pizza_client
        .add_pizza(&PizzaEntity::new(""))
        .await
        .unwrap_err();

    assert!(err.message.starts_with("HTTP 400"));
}

#[tokio::test]
async fn test_put_path_id_wins_over_body_id() {
    let test_env = TestEnvironment::new().await;
    let created = test_env
        .pizza_client
        .add_pizza(&PizzaEntity::new("Capricciosa"))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let response = test_env
        .client
        .put(test_env.url(&format!("/api/pizzas/{}", id)))
        .json(&json!({"id": Uuid::new_v4(), "name": "Capricciosa Bianca"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["affected"], 1);

    let fetched = test_env.pizza_client.get_pizza(id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Capricciosa Bianca");
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let test_env = TestEnvironment::new().await;

    let response = test_env
        .client
        .post(test_env.url("/api/pizzas"))
        .header("content-type", "text/plain")
        .body("name=Margherita")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 415);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let test_env = TestEnvironment::with_server_config(ServerConfig {
        max_request_size: 64,
        ..ServerConfig::default()
    })
    .await;

    let response = test_env
        .client
        .post(test_env.url("/api/pizzas"))
        .json(&json!({"name": "x".repeat(200)}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 413);
}

#[tokio::test]
async fn test_seed_populates_catalog() {
    let test_env = TestEnvironment::new().await;

    test_env.seed_test_data().await;

    let pizzas = test_env.pizza_client.get_all_pizzas().await.unwrap();
    assert!(!pizzas.is_empty());
    assert!(pizzas.iter().all(|p| p.id.is_some()));
}

#[tokio::test]
async fn test_health_and_metrics_endpoints() {
    let test_env = TestEnvironment::new().await;

    let health: Value = test_env
        .client
        .get(test_env.url("/health/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "pizza-admin");

    test_env.pizza_client.get_all_pizzas().await.unwrap();

    let response = test_env
        .client
        .get(test_env.url("/metrics"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("http_requests_total"));
    assert!(text.contains("pizza_operations_total"));
}

#[tokio::test]
async fn test_security_headers_present() {
    let test_env = TestEnvironment::new().await;

    let response = test_env
        .client
        .get(test_env.url("/api/pizzas"))
        .header("Origin", "http://admin.example.com")
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_preflight_for_update_succeeds() {
    let test_env = TestEnvironment::new().await;

    let response = test_env
        .client
        .request(
            reqwest::Method::OPTIONS,
            test_env.url(&format!("/api/pizzas/{}", Uuid::new_v4())),
        )
        .header("Origin", "http://admin.example.com")
        .header("Access-Control-Request-Method", "PUT")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert!(
        response.status().is_success(),
        "preflight returned {}",
        response.status()
    );
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let allowed = response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed.contains("PUT"));
    assert!(allowed.contains("DELETE"));
}
