// Services module - business logic layer

pub mod pizza_service;
pub mod price_calculator;
pub mod validator;

pub use pizza_service::PizzaService;
pub use price_calculator::{format_price, PriceCalculator, PricingConfig, StandardPriceCalculator};
pub use validator::{DefaultPizzaValidator, PizzaValidator};
