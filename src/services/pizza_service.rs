use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{PizzaEntity, PizzaRecord, ServiceError, ServiceResult};
use crate::repositories::PizzaRepository;
use crate::services::PizzaValidator;

/// Catalog service: validates entities and orchestrates the repository
pub struct PizzaService {
    validator: Arc<dyn PizzaValidator>,
    repository: Arc<dyn PizzaRepository>,
}

impl PizzaService {
    pub fn new(validator: Arc<dyn PizzaValidator>, repository: Arc<dyn PizzaRepository>) -> Self {
        Self {
            validator,
            repository,
        }
    }

    /// List every pizza in the store
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ServiceResult<Vec<PizzaEntity>> {
        let records = self.repository.get_all().await?;

        crate::info_with_trace!("Listed {} pizzas", records.len());
        Ok(records.into_iter().map(PizzaEntity::from).collect())
    }

    /// Get a pizza by ID; a missing pizza is `None`, not an error
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<Option<PizzaEntity>> {
        let record = self.repository.get_by_id(id).await?;

        if record.is_none() {
            crate::info_with_trace!("Pizza not found");
        }
        Ok(record.map(PizzaEntity::from))
    }

    /// Validate and persist a new pizza, returning it with its assigned ID
    #[instrument(skip(self, pizza), fields(name = %pizza.name))]
    pub async fn add(&self, pizza: PizzaEntity) -> ServiceResult<PizzaEntity> {
        self.ensure_valid(&pizza).await?;

        let created = self.repository.add(PizzaRecord::from(pizza)).await?;

        crate::info_with_trace!("Pizza created with ID: {}", created.id);
        Ok(PizzaEntity::from(created))
    }

    /// Validate and replace an existing pizza; returns the affected count
    #[instrument(skip(self, pizza), fields(id = ?pizza.id, name = %pizza.name))]
    pub async fn update(&self, pizza: PizzaEntity) -> ServiceResult<u64> {
        self.ensure_valid(&pizza).await?;

        // Nothing to match against without an ID
        if pizza.id.is_none() {
            crate::warn_with_trace!("Update requested for a pizza without an ID");
            return Ok(0);
        }

        let affected = self.repository.update(PizzaRecord::from(pizza)).await?;

        crate::info_with_trace!("Pizza update affected {} rows", affected);
        Ok(affected)
    }

    /// Delete a pizza by ID; returns the affected count
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: Uuid) -> ServiceResult<u64> {
        let affected = self.repository.delete(id).await?;

        crate::info_with_trace!("Pizza delete affected {} rows", affected);
        Ok(affected)
    }

    async fn ensure_valid(&self, pizza: &PizzaEntity) -> ServiceResult<()> {
        let errors = self.validator.is_valid_pizza(pizza).await;

        if errors.is_empty() {
            return Ok(());
        }

        crate::warn_with_trace!("Pizza failed validation with {} errors", errors.len());
        Err(ServiceError::from_messages(&errors))
    }
}
