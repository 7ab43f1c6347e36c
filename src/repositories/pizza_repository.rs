use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{PizzaRecord, RepositoryError, RepositoryResult};

/// Trait defining the interface for pizza data access operations
#[async_trait]
pub trait PizzaRepository: Send + Sync {
    /// Fetch every stored pizza
    async fn get_all(&self) -> RepositoryResult<Vec<PizzaRecord>>;

    /// Find a pizza by its ID
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<PizzaRecord>>;

    /// Insert a new pizza and return it as stored
    async fn add(&self, pizza: PizzaRecord) -> RepositoryResult<PizzaRecord>;

    /// Replace an existing pizza; returns the number of rows affected
    async fn update(&self, pizza: PizzaRecord) -> RepositoryResult<u64>;

    /// Remove a pizza; returns the number of rows affected
    async fn delete(&self, id: Uuid) -> RepositoryResult<u64>;
}

/// Process-local store, used by default and in tests
#[derive(Default)]
pub struct InMemoryPizzaRepository {
    pizzas: RwLock<HashMap<Uuid, PizzaRecord>>,
}

impl InMemoryPizzaRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PizzaRepository for InMemoryPizzaRepository {
    #[instrument(skip(self))]
    async fn get_all(&self) -> RepositoryResult<Vec<PizzaRecord>> {
        let pizzas = self.pizzas.read().await;

        let mut records: Vec<PizzaRecord> = pizzas.values().cloned().collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        info!("Found {} pizzas", records.len());
        Ok(records)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<PizzaRecord>> {
        Ok(self.pizzas.read().await.get(&id).cloned())
    }

    #[instrument(skip(self, pizza), fields(id = %pizza.id))]
    async fn add(&self, pizza: PizzaRecord) -> RepositoryResult<PizzaRecord> {
        let mut pizzas = self.pizzas.write().await;

        if pizzas.contains_key(&pizza.id) {
            return Err(RepositoryError::ConstraintViolation {
                message: format!("Pizza {} already exists", pizza.id),
            });
        }

        pizzas.insert(pizza.id, pizza.clone());
        info!("Pizza created");
        Ok(pizza)
    }

    #[instrument(skip(self, pizza), fields(id = %pizza.id))]
    async fn update(&self, mut pizza: PizzaRecord) -> RepositoryResult<u64> {
        let mut pizzas = self.pizzas.write().await;

        match pizzas.get_mut(&pizza.id) {
            Some(existing) => {
                pizza.created_at = existing.created_at;
                pizza.updated_at = chrono::Utc::now();
                *existing = pizza;
                info!("Pizza updated");
                Ok(1)
            }
            None => {
                info!("Pizza not found for update");
                Ok(0)
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        let removed = self.pizzas.write().await.remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}
