use rust_decimal::Decimal;
use std::collections::HashSet;

use super::{PizzaEntity, Topping, ValidationError, ValidationResult};

/// Validation constants
pub const MAX_PIZZA_NAME_LENGTH: usize = 100;
pub const MAX_DESCRIPTION_LENGTH: usize = 500;
pub const MAX_TOPPINGS_COUNT: usize = 20;
pub const MAX_TOPPING_NAME_LENGTH: usize = 50;
pub const MIN_TOPPING_PRICE: Decimal = Decimal::ZERO;
pub const MAX_TOPPING_PRICE: Decimal = Decimal::from_parts(9999, 0, 0, false, 2); // 99.99

/// Run every rule against the entity and keep all failures, in rule order
pub fn validate_pizza(pizza: &PizzaEntity) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(e) = validate_pizza_name(&pizza.name) {
        errors.push(e);
    }
    if let Some(description) = &pizza.description {
        if let Err(e) = validate_description(description) {
            errors.push(e);
        }
    }
    if let Err(e) = validate_toppings_count(&pizza.toppings) {
        errors.push(e);
    }
    for topping in &pizza.toppings {
        if let Err(e) = validate_topping_name(&topping.name) {
            errors.push(e);
        }
        if let Err(e) = validate_topping_price(&topping.price) {
            errors.push(e);
        }
    }
    errors.extend(duplicate_toppings(&pizza.toppings));

    errors
}

/// Validate pizza name
pub fn validate_pizza_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "pizza_name".to_string(),
        });
    }

    let length = trimmed.chars().count();
    if length > MAX_PIZZA_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "pizza_name".to_string(),
            max_length: MAX_PIZZA_NAME_LENGTH,
            actual_length: length,
        });
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidValue {
            field: "pizza_name".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate optional pizza description
pub fn validate_description(description: &str) -> ValidationResult<()> {
    let length = description.trim().chars().count();

    if length > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "pizza_description".to_string(),
            max_length: MAX_DESCRIPTION_LENGTH,
            actual_length: length,
        });
    }

    Ok(())
}

/// Validate the number of toppings
pub fn validate_toppings_count(toppings: &[Topping]) -> ValidationResult<()> {
    if toppings.len() > MAX_TOPPINGS_COUNT {
        return Err(ValidationError::TooMany {
            field: "toppings".to_string(),
            max_count: MAX_TOPPINGS_COUNT,
            actual_count: toppings.len(),
        });
    }

    Ok(())
}

/// Validate a topping name
pub fn validate_topping_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "topping_name".to_string(),
        });
    }

    let length = trimmed.chars().count();
    if length > MAX_TOPPING_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "topping_name".to_string(),
            max_length: MAX_TOPPING_NAME_LENGTH,
            actual_length: length,
        });
    }

    Ok(())
}

/// Validate a topping price
pub fn validate_topping_price(price: &Decimal) -> ValidationResult<()> {
    if *price < MIN_TOPPING_PRICE || *price > MAX_TOPPING_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "topping_price".to_string(),
            min: MIN_TOPPING_PRICE.to_string(),
            max: MAX_TOPPING_PRICE.to_string(),
            value: price.to_string(),
        });
    }

    if price.normalize().scale() > 2 {
        return Err(ValidationError::InvalidValue {
            field: "topping_price".to_string(),
            value: price.to_string(),
            reason: "Price cannot have more than 2 decimal places".to_string(),
        });
    }

    Ok(())
}

/// Topping names must be unique per pizza, ignoring case
fn duplicate_toppings(toppings: &[Topping]) -> Vec<ValidationError> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut errors = Vec::new();

    for topping in toppings {
        let key = topping.name.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if !seen.insert(key.clone()) && reported.insert(key) {
            errors.push(ValidationError::Duplicate {
                field: "topping_name".to_string(),
                value: topping.name.trim().to_string(),
            });
        }
    }

    errors
}
