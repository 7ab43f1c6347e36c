use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::services::PricingConfig;

/// Prefix for every environment variable the service reads
pub const ENV_PREFIX: &str = "PIZZA";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
    pub pricing: PricingConfig,
    /// Present only when the DynamoDB backend is selected
    pub aws: Option<AwsConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

/// Where pizzas are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    DynamoDb,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::DynamoDb => write!(f, "dynamodb"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub storage_backend: StorageBackend,
    #[serde(default = "default_pizzas_table")]
    pub table_name: String,
    #[serde(default = "default_region")]
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub dynamodb_client: DynamoDbClient,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub enable_json_logging: bool,
}

impl Config {
    pub async fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let server = ServerConfig::from_env()?;
        let storage = StorageConfig::from_env()?;
        let observability = ObservabilityConfig::from_env()?;
        let pricing = load_section::<PricingConfig>("pricing")?;

        let aws = match storage.storage_backend {
            StorageBackend::DynamoDb => {
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(aws_config::Region::new(storage.region.clone()))
                    .load()
                    .await;

                Some(AwsConfig {
                    region: storage.region.clone(),
                    dynamodb_client: DynamoDbClient::new(&sdk_config),
                })
            }
            StorageBackend::Memory => None,
        };

        let config = Config {
            server,
            storage,
            observability,
            pricing,
            aws,
        };

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Configuration: {:?}", config);

        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "Server port cannot be 0".to_string(),
            });
        }

        if self.server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Request timeout cannot be 0".to_string(),
            });
        }

        if self.server.max_request_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "Max request size cannot be 0".to_string(),
            });
        }

        if self.storage.storage_backend == StorageBackend::DynamoDb
            && self.storage.table_name.trim().is_empty()
        {
            return Err(ConfigError::ValidationError {
                message: "Pizzas table name cannot be empty".to_string(),
            });
        }

        let prices = [
            self.pricing.small_base_price,
            self.pricing.medium_base_price,
            self.pricing.large_base_price,
        ];
        if prices.iter().any(|price| *price < Decimal::ZERO) {
            return Err(ConfigError::ValidationError {
                message: "Base prices cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}

fn load_section<T: serde::de::DeserializeOwned>(section: &str) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::Environment::with_prefix(ENV_PREFIX))
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_timeout(),
            max_request_size: default_max_request_size(),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("server")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("storage")
    }
}

impl ObservabilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        load_section("observability")
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_pizzas_table() -> String {
    "Pizzas".to_string()
}

pub(crate) fn default_region() -> String {
    "us-west-2".to_string()
}

pub(crate) fn default_service_name() -> String {
    "pizza-admin".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}
