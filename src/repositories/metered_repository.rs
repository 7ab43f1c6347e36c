use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{PizzaRecord, RepositoryResult};
use crate::observability::{Metrics, StorageTracer};
use crate::repositories::PizzaRepository;

/// Wraps any repository and records timing and outcome of each call
pub struct MeteredPizzaRepository {
    inner: Arc<dyn PizzaRepository>,
    tracer: StorageTracer,
}

impl MeteredPizzaRepository {
    pub fn new(inner: Arc<dyn PizzaRepository>, metrics: Arc<Metrics>, table: &str) -> Self {
        Self {
            inner,
            tracer: StorageTracer::new(metrics, table),
        }
    }
}

#[async_trait]
impl PizzaRepository for MeteredPizzaRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<PizzaRecord>> {
        self.tracer
            .trace_operation("scan", self.inner.get_all())
            .await
    }

    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<PizzaRecord>> {
        self.tracer
            .trace_operation("get_item", self.inner.get_by_id(id))
            .await
    }

    async fn add(&self, pizza: PizzaRecord) -> RepositoryResult<PizzaRecord> {
        self.tracer
            .trace_operation("put_item", self.inner.add(pizza))
            .await
    }

    async fn update(&self, pizza: PizzaRecord) -> RepositoryResult<u64> {
        self.tracer
            .trace_operation("update_item", self.inner.update(pizza))
            .await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        self.tracer
            .trace_operation("delete_item", self.inner.delete(id))
            .await
    }
}
