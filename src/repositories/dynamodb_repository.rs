use async_trait::async_trait;
use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::models::{PizzaRecord, PizzaSize, RepositoryError, RepositoryResult, Topping};

use super::PizzaRepository;

/// DynamoDB implementation of the PizzaRepository trait
pub struct DynamoDbPizzaRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
}

impl DynamoDbPizzaRepository {
    /// Create a new DynamoDB pizza repository
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
        }
    }

    /// Client span carrying the table and operation for trace backends
    fn create_dynamodb_span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %self.table_name,
            "aws.request_id" = tracing::field::Empty,
            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),
            "db.system" = "dynamodb",
            "db.name" = %self.table_name,
            "db.operation" = operation,
        )
    }

    /// Convert a PizzaRecord to DynamoDB attribute values
    pub fn pizza_to_item(&self, pizza: &PizzaRecord) -> HashMap<String, AttributeValue> {
        let mut item = HashMap::new();

        item.insert("id".to_string(), AttributeValue::S(pizza.id.to_string()));
        item.insert("name".to_string(), AttributeValue::S(pizza.name.clone()));
        if let Some(ref description) = pizza.description {
            item.insert(
                "description".to_string(),
                AttributeValue::S(description.clone()),
            );
        }
        item.insert("size".to_string(), AttributeValue::S(pizza.size.to_string()));
        item.insert("toppings".to_string(), toppings_to_attribute(&pizza.toppings));
        item.insert(
            "created_at".to_string(),
            AttributeValue::S(pizza.created_at.to_rfc3339()),
        );
        item.insert(
            "updated_at".to_string(),
            AttributeValue::S(pizza.updated_at.to_rfc3339()),
        );

        item
    }

    /// Convert a DynamoDB item to a PizzaRecord
    pub fn item_to_pizza(
        &self,
        item: &HashMap<String, AttributeValue>,
    ) -> RepositoryResult<PizzaRecord> {
        let id = item
            .get("id")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| malformed("Invalid id"))?;

        let name = item
            .get("name")
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| malformed("Missing name"))?
            .clone();

        let description = item.get("description").and_then(|v| v.as_s().ok()).cloned();

        let size = item
            .get("size")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| PizzaSize::from_str(s).ok())
            .ok_or_else(|| malformed("Invalid size"))?;

        let toppings = match item.get("toppings").and_then(|v| v.as_l().ok()) {
            Some(list) => list
                .iter()
                .map(attribute_to_topping)
                .collect::<RepositoryResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        let created_at = item
            .get("created_at")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| malformed("Invalid created_at"))?;

        // Items written before updated_at existed fall back to created_at
        let updated_at = item
            .get("updated_at")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(created_at);

        Ok(PizzaRecord {
            id,
            name,
            description,
            size,
            toppings,
            created_at,
            updated_at,
        })
    }

    /// Convert DynamoDB error to RepositoryError
    fn map_dynamodb_error(&self, error: DynamoDbError) -> RepositoryError {
        error!("DynamoDB error: {:?}", error);

        if let DynamoDbError::ResourceNotFoundException(_) = error {
            return RepositoryError::TableNotFound {
                table_name: self.table_name.clone(),
            };
        }

        RepositoryError::AwsSdk {
            message: error.to_string(),
        }
    }
}

fn malformed(message: &str) -> RepositoryError {
    RepositoryError::MalformedItem {
        message: message.to_string(),
    }
}

fn toppings_to_attribute(toppings: &[Topping]) -> AttributeValue {
    AttributeValue::L(
        toppings
            .iter()
            .map(|topping| {
                let mut map = HashMap::new();
                map.insert("name".to_string(), AttributeValue::S(topping.name.clone()));
                map.insert(
                    "price".to_string(),
                    AttributeValue::N(topping.price.to_string()),
                );
                AttributeValue::M(map)
            })
            .collect(),
    )
}

fn attribute_to_topping(value: &AttributeValue) -> RepositoryResult<Topping> {
    let map = value.as_m().map_err(|_| malformed("Invalid topping"))?;

    let name = map
        .get("name")
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| malformed("Missing topping name"))?
        .clone();

    let price = map
        .get("price")
        .and_then(|v| v.as_n().ok())
        .and_then(|s| Decimal::from_str(s).ok())
        .ok_or_else(|| malformed("Invalid topping price"))?;

    Ok(Topping { name, price })
}

#[async_trait]
impl PizzaRepository for DynamoDbPizzaRepository {
    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn get_all(&self) -> RepositoryResult<Vec<PizzaRecord>> {
        info!("Scanning all pizzas");

        let mut pizzas = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let response = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take())
                .send()
                .instrument(self.create_dynamodb_span("Scan"))
                .await
                .map_err(|e| self.map_dynamodb_error(e.into()))?;

            for item in response.items() {
                match self.item_to_pizza(item) {
                    Ok(pizza) => pizzas.push(pizza),
                    Err(e) => warn!("Skipping unreadable pizza item: {}", e),
                }
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} pizzas", pizzas.len());
        Ok(pizzas)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn get_by_id(&self, id: Uuid) -> RepositoryResult<Option<PizzaRecord>> {
        let get_span = self.create_dynamodb_span("GetItem");

        let response = async {
            let result = self
                .client
                .get_item()
                .table_name(&self.table_name)
                .key("id", AttributeValue::S(id.to_string()))
                .send()
                .await;

            if let Ok(output) = &result {
                if let Some(request_id) = output.request_id() {
                    tracing::Span::current().record("aws.request_id", request_id);
                }
            }

            result.map_err(|e| self.map_dynamodb_error(e.into()))
        }
        .instrument(get_span)
        .await?;

        response
            .item
            .as_ref()
            .map(|item| self.item_to_pizza(item))
            .transpose()
    }

    #[instrument(skip(self, pizza), fields(table = %self.table_name, id = %pizza.id))]
    async fn add(&self, pizza: PizzaRecord) -> RepositoryResult<PizzaRecord> {
        let item = self.pizza_to_item(&pizza);

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .instrument(self.create_dynamodb_span("PutItem"))
            .await;

        if let Err(e) = result {
            if e.as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false)
            {
                return Err(RepositoryError::ConstraintViolation {
                    message: format!("Pizza {} already exists", pizza.id),
                });
            }
            return Err(self.map_dynamodb_error(e.into()));
        }

        info!("Pizza created");
        Ok(pizza)
    }

    #[instrument(skip(self, pizza), fields(table = %self.table_name, id = %pizza.id))]
    async fn update(&self, pizza: PizzaRecord) -> RepositoryResult<u64> {
        let mut expression =
            "SET #name = :name, #size = :size, toppings = :toppings, updated_at = :now"
                .to_string();

        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(pizza.id.to_string()))
            .expression_attribute_names("#name", "name")
            .expression_attribute_names("#size", "size")
            .expression_attribute_names("#description", "description")
            .expression_attribute_values(":name", AttributeValue::S(pizza.name.clone()))
            .expression_attribute_values(":size", AttributeValue::S(pizza.size.to_string()))
            .expression_attribute_values(":toppings", toppings_to_attribute(&pizza.toppings))
            .expression_attribute_values(":now", AttributeValue::S(Utc::now().to_rfc3339()))
            .condition_expression("attribute_exists(id)");

        match pizza.description {
            Some(ref description) => {
                expression.push_str(", #description = :description");
                request = request.expression_attribute_values(
                    ":description",
                    AttributeValue::S(description.clone()),
                );
            }
            None => expression.push_str(" REMOVE #description"),
        }

        let result = request
            .update_expression(expression)
            .send()
            .instrument(self.create_dynamodb_span("UpdateItem"))
            .await;

        match result {
            Ok(_) => {
                info!("Pizza updated");
                Ok(1)
            }
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                info!("Pizza not found for update");
                Ok(0)
            }
            Err(e) => Err(self.map_dynamodb_error(e.into())),
        }
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn delete(&self, id: Uuid) -> RepositoryResult<u64> {
        let response = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", AttributeValue::S(id.to_string()))
            .return_values(ReturnValue::AllOld)
            .send()
            .instrument(self.create_dynamodb_span("DeleteItem"))
            .await
            .map_err(|e| self.map_dynamodb_error(e.into()))?;

        let deleted = response
            .attributes
            .map(|attributes| !attributes.is_empty())
            .unwrap_or(false);

        info!(deleted, "Pizza delete completed");
        Ok(u64::from(deleted))
    }
}
