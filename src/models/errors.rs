use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },
}

impl ServiceError {
    /// Build a validation error from the validator's messages, in order
    pub fn from_messages(messages: &[String]) -> Self {
        ServiceError::Validation {
            message: messages.join("; "),
        }
    }
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("AWS SDK error: {message}")]
    AwsSdk { message: String },

    #[error("DynamoDB table not found: {table_name}. Ensure the table exists and IAM permissions are correct.")]
    TableNotFound { table_name: String },

    #[error("Malformed item: {message}")]
    MalformedItem { message: String },
}

/// Validation failures for a single field
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Too many items: {field}, max_count={max_count}, actual_count={actual_count}")]
    TooMany {
        field: String,
        max_count: usize,
        actual_count: usize,
    },

    #[error("Duplicate value: {field}={value}")]
    Duplicate { field: String, value: String },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for single-rule validation checks
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let validation_error = ValidationError::RequiredField {
            field: "pizza_name".to_string(),
        };
        assert_eq!(
            validation_error.to_string(),
            "Required field missing: pizza_name"
        );

        let repo_error = RepositoryError::TableNotFound {
            table_name: "Pizzas".to_string(),
        };
        assert!(repo_error.to_string().contains("Pizzas"));
    }

    #[test]
    fn test_messages_are_joined_in_order() {
        let error = ServiceError::from_messages(&[
            "first problem".to_string(),
            "second problem".to_string(),
        ]);

        match error {
            ServiceError::Validation { message } => {
                assert_eq!(message, "first problem; second problem");
            }
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_error_conversion() {
        let validation_error = ValidationError::InvalidValue {
            field: "topping_price".to_string(),
            value: "-1".to_string(),
            reason: "Price cannot be negative".to_string(),
        };

        let service_error: ServiceError = validation_error.into();
        match service_error {
            ServiceError::Validation { message } => {
                assert!(message.contains("Invalid field value"));
            }
            _ => panic!("Expected Validation conversion"),
        }
    }
}
