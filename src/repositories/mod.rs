// Repositories module - data access layer

pub mod dynamodb_repository;
pub mod metered_repository;
pub mod pizza_repository;

pub use dynamodb_repository::DynamoDbPizzaRepository;
pub use metered_repository::MeteredPizzaRepository;
pub use pizza_repository::{InMemoryPizzaRepository, PizzaRepository};
