use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PizzaSize;

/// Name given to the entity the add panel opens with
pub const PLACEHOLDER_PIZZA_NAME: &str = "New Pizza";

/// Public catalog entry as seen by API callers and the admin page
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PizzaEntity {
    /// Absent until the store assigns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub size: PizzaSize,
    #[serde(default)]
    pub toppings: Vec<Topping>,
}

/// A priced topping on a pizza
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topping {
    pub name: String,
    pub price: Decimal,
}

impl Topping {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

impl PizzaEntity {
    /// Create an unsaved entity with the given name and default attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The entity the add panel is pre-populated with
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_PIZZA_NAME)
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_size(mut self, size: PizzaSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_topping(mut self, name: impl Into<String>, price: Decimal) -> Self {
        self.toppings.push(Topping::new(name, price));
        self
    }
}

/// Storage shape of a pizza; the repository owns the timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PizzaRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub size: PizzaSize,
    pub toppings: Vec<Topping>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PizzaEntity> for PizzaRecord {
    fn from(entity: PizzaEntity) -> Self {
        let now = Utc::now();
        Self {
            id: entity.id.unwrap_or_else(Uuid::new_v4),
            name: entity.name,
            description: entity.description,
            size: entity.size,
            toppings: entity.toppings,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<PizzaRecord> for PizzaEntity {
    fn from(record: PizzaRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.name,
            description: record.description,
            size: record.size,
            toppings: record.toppings,
        }
    }
}

/// Body returned by update and delete endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectedResponse {
    pub affected: u64,
}
