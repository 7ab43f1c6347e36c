use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::models::{PizzaEntity, PizzaSize};

/// Derives a display price for a pizza; implementations must be pure
pub trait PriceCalculator: Send + Sync {
    fn calculate_price(&self, pizza: &PizzaEntity) -> Decimal;
}

/// Base price per size
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricingConfig {
    #[serde(default = "default_small_price")]
    pub small_base_price: Decimal,
    #[serde(default = "default_medium_price")]
    pub medium_base_price: Decimal,
    #[serde(default = "default_large_price")]
    pub large_base_price: Decimal,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            small_base_price: default_small_price(),
            medium_base_price: default_medium_price(),
            large_base_price: default_large_price(),
        }
    }
}

pub(crate) fn default_small_price() -> Decimal {
    dec!(8.00)
}

pub(crate) fn default_medium_price() -> Decimal {
    dec!(10.00)
}

pub(crate) fn default_large_price() -> Decimal {
    dec!(12.00)
}

/// Size base price plus the sum of topping prices
#[derive(Debug, Clone, Default)]
pub struct StandardPriceCalculator {
    config: PricingConfig,
}

impl StandardPriceCalculator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    fn base_price(&self, size: PizzaSize) -> Decimal {
        match size {
            PizzaSize::Small => self.config.small_base_price,
            PizzaSize::Medium => self.config.medium_base_price,
            PizzaSize::Large => self.config.large_base_price,
        }
    }
}

impl PriceCalculator for StandardPriceCalculator {
    fn calculate_price(&self, pizza: &PizzaEntity) -> Decimal {
        let toppings: Decimal = pizza.toppings.iter().map(|t| t.price).sum();
        self.base_price(pizza.size) + toppings
    }
}

/// Two-decimal display form, rounding half away from zero
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
