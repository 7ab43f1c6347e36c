use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use pizza_admin::{
    config::StorageBackend,
    create_app, init_observability,
    observability::Metrics,
    repositories::{
        DynamoDbPizzaRepository, InMemoryPizzaRepository, MeteredPizzaRepository,
        PizzaRepository,
    },
    services::{DefaultPizzaValidator, PizzaService},
    shutdown_observability, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_environment()
        .await
        .context("Failed to load configuration")?;

    init_observability(&config.observability).context("Failed to initialize observability")?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );

    let metrics = Arc::new(Metrics::new()?);

    let (store, table): (Arc<dyn PizzaRepository>, String) =
        match (config.storage.storage_backend, &config.aws) {
            (StorageBackend::DynamoDb, Some(aws)) => {
                info!(
                    "Using DynamoDB table {} in {}",
                    config.storage.table_name, aws.region
                );
                let repository = DynamoDbPizzaRepository::new(
                    Arc::new(aws.dynamodb_client.clone()),
                    config.storage.table_name.clone(),
                    aws.region.clone(),
                );
                (Arc::new(repository), config.storage.table_name.clone())
            }
            (StorageBackend::DynamoDb, None) => {
                anyhow::bail!("DynamoDB storage selected but no AWS client was configured")
            }
            (StorageBackend::Memory, _) => {
                info!("Using in-memory pizza store");
                (Arc::new(InMemoryPizzaRepository::new()), "memory".to_string())
            }
        };

    let repository = Arc::new(MeteredPizzaRepository::new(store, metrics.clone(), &table));
    let pizza_service = Arc::new(PizzaService::new(
        Arc::new(DefaultPizzaValidator::new()),
        repository,
    ));

    let app = create_app(metrics, pizza_service, &config.server);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid host address: {}", config.server.host))?,
        config.server.port,
    );
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    shutdown_observability().await;
}
