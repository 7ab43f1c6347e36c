use axum::{extract::State, http::StatusCode, response::Json};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::{PizzaEntity, PizzaSize};
use crate::services::PizzaService;

#[derive(Clone)]
pub struct AdminState {
    pub pizza_service: Arc<PizzaService>,
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub pizzas_created: usize,
    pub timestamp: String,
}

/// Seed the catalog with sample pizzas; each one goes through validation
#[instrument(name = "seed_catalog", skip(state))]
pub async fn seed_catalog(
    State(state): State<AdminState>,
) -> Result<Json<SeedResponse>, (StatusCode, Json<Value>)> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let mut created_count = 0;
    let mut errors = Vec::new();

    for pizza in sample_pizzas() {
        let name = pizza.name.clone();
        match state.pizza_service.add(pizza).await {
            Ok(_) => created_count += 1,
            Err(err) => {
                warn!("Failed to seed pizza {}: {}", name, err);
                errors.push(format!("{}: {}", name, err));
            }
        }
    }

    if created_count == 0 && !errors.is_empty() {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "Failed to seed catalog",
                "message": errors.join("; "),
                "timestamp": timestamp,
            })),
        ));
    }

    let message = if errors.is_empty() {
        format!("Catalog seeded with {} pizzas", created_count)
    } else {
        format!(
            "Catalog seeded with {} pizzas, {} errors occurred",
            created_count,
            errors.len()
        )
    };
    info!("{}", message);

    Ok(Json(SeedResponse {
        message,
        pizzas_created: created_count,
        timestamp,
    }))
}

pub(crate) fn sample_pizzas() -> Vec<PizzaEntity> {
    vec![
        PizzaEntity::new("Margherita")
            .with_description("Tomato, mozzarella and fresh basil")
            .with_topping("Basil", dec!(0.50)),
        PizzaEntity::new("Pepperoni")
            .with_size(PizzaSize::Large)
            .with_topping("Pepperoni", dec!(1.75))
            .with_topping("Extra Cheese", dec!(1.00)),
        PizzaEntity::new("Quattro Formaggi")
            .with_description("Four cheeses on a white base")
            .with_topping("Gorgonzola", dec!(1.50))
            .with_topping("Parmesan", dec!(1.25))
            .with_topping("Fontina", dec!(1.25)),
        PizzaEntity::new("Marinara")
            .with_size(PizzaSize::Small)
            .with_description("Tomato, garlic and oregano"),
        PizzaEntity::new("Diavola")
            .with_topping("Spicy Salami", dec!(1.80))
            .with_topping("Chili", dec!(0.30)),
    ]
}
