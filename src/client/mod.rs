// Remote client for the catalog API, used by the admin page

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::models::{AffectedResponse, PizzaEntity};

/// Any failure talking to the catalog service: connect errors, non-success
/// statuses and undecodable bodies alike
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("Request failed: {}", err))
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

#[async_trait]
pub trait PizzaClient: Send + Sync {
    async fn get_all_pizzas(&self) -> TransportResult<Vec<PizzaEntity>>;

    async fn get_pizza(&self, id: Uuid) -> TransportResult<Option<PizzaEntity>>;

    /// Returns the stored entity with its assigned ID
    async fn add_pizza(&self, pizza: &PizzaEntity) -> TransportResult<PizzaEntity>;

    /// Returns the affected count; an unknown ID is 0, not an error
    async fn update_pizza(&self, pizza: &PizzaEntity) -> TransportResult<u64>;

    /// Returns the affected count; an unknown ID is 0, not an error
    async fn delete_pizza(&self, id: Uuid) -> TransportResult<u64>;
}

/// `PizzaClient` over the JSON API served by `create_app`
#[derive(Debug, Clone)]
pub struct HttpPizzaClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPizzaClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn pizzas_url(&self) -> String {
        format!("{}/api/pizzas", self.base_url)
    }

    fn pizza_url(&self, id: Uuid) -> String {
        format!("{}/api/pizzas/{}", self.base_url, id)
    }

    /// 404 on a mutation means nothing matched
    async fn affected_count(response: Response) -> TransportResult<u64> {
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        let body: AffectedResponse = decode(response).await?;
        Ok(body.affected)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, response).await);
    }

    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::new(format!("Invalid response body: {}", e)))
}

async fn status_error(status: StatusCode, response: Response) -> TransportError {
    // Prefer the server's own message when the body is one of our error payloads
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("message").and_then(Value::as_str).map(str::to_string));

    match detail {
        Some(message) => TransportError::new(format!("HTTP {}: {}", status.as_u16(), message)),
        None => TransportError::new(format!("HTTP {}", status)),
    }
}

#[async_trait]
impl PizzaClient for HttpPizzaClient {
    #[instrument(skip(self))]
    async fn get_all_pizzas(&self) -> TransportResult<Vec<PizzaEntity>> {
        let response = self.client.get(self.pizzas_url()).send().await?;
        decode(response).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_pizza(&self, id: Uuid) -> TransportResult<Option<PizzaEntity>> {
        let response = self.client.get(self.pizza_url(id)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response).await.map(Some)
    }

    #[instrument(skip(self, pizza), fields(name = %pizza.name))]
    async fn add_pizza(&self, pizza: &PizzaEntity) -> TransportResult<PizzaEntity> {
        let response = self
            .client
            .post(self.pizzas_url())
            .json(pizza)
            .send()
            .await?;
        decode(response).await
    }

    #[instrument(skip(self, pizza), fields(id = ?pizza.id))]
    async fn update_pizza(&self, pizza: &PizzaEntity) -> TransportResult<u64> {
        let Some(id) = pizza.id else {
            debug!("Skipping update of a pizza without an ID");
            return Ok(0);
        };

        let response = self
            .client
            .put(self.pizza_url(id))
            .json(pizza)
            .send()
            .await?;
        Self::affected_count(response).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_pizza(&self, id: Uuid) -> TransportResult<u64> {
        let response = self.client.delete(self.pizza_url(id)).send().await?;
        Self::affected_count(response).await
    }
}
