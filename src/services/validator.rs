use async_trait::async_trait;

use crate::models::{validate_pizza, PizzaEntity};

/// Checks a pizza before it is written; an empty result means valid
#[async_trait]
pub trait PizzaValidator: Send + Sync {
    async fn is_valid_pizza(&self, pizza: &PizzaEntity) -> Vec<String>;
}

/// Field-level rules from `models::validation`, all failures reported
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPizzaValidator;

impl DefaultPizzaValidator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PizzaValidator for DefaultPizzaValidator {
    async fn is_valid_pizza(&self, pizza: &PizzaEntity) -> Vec<String> {
        validate_pizza(pizza)
            .into_iter()
            .map(|error| error.to_string())
            .collect()
    }
}
