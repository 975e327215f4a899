//! Invoice API server
//!
//! Reads configuration from the YAML file named by `INVOICE_API_CONFIG` (if
//! set) and `INVOICE_API_*` environment overrides, then serves the invoice
//! routes until Ctrl+C or SIGTERM.

use anyhow::{Result, anyhow};
use invoice_api::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("invoice_api=info,tower_http=info")),
        )
        .init();

    let config_path = std::env::var("INVOICE_API_CONFIG").ok();
    let config = AppConfig::load(config_path.as_deref())?;

    let store = build_store(&config.storage).await?;
    let rates: Arc<dyn ExchangeRateProvider> =
        Arc::new(HttpExchangeRateClient::from_config(&config.exchange_rates)?);

    tracing::info!(
        backend = ?config.storage.backend,
        rate_timeout_secs = config.exchange_rates.timeout_secs,
        "Starting invoice-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    ServerBuilder::new(config.server.clone())
        .with_service(InvoiceService::new(store, rates))
        .serve()
        .await
}

async fn build_store(config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    match config.backend {
        StorageBackend::Memory => memory_store(),
        StorageBackend::Mongodb => mongo_store(config).await,
    }
}

#[cfg(feature = "in-memory")]
fn memory_store() -> Result<Arc<dyn InvoiceStore>> {
    Ok(Arc::new(InMemoryInvoiceStore::new()))
}

#[cfg(not(feature = "in-memory"))]
fn memory_store() -> Result<Arc<dyn InvoiceStore>> {
    Err(anyhow!("storage backend 'memory' requires the `in-memory` feature"))
}

#[cfg(feature = "mongodb_backend")]
async fn mongo_store(config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    let client = mongodb::Client::with_uri_str(&config.connection_string).await?;
    let store = MongoInvoiceStore::new(
        client.database(&config.database_name),
        config.collection_name.clone(),
    );
    store
        .ensure_indexes()
        .await
        .map_err(|e| anyhow!("MongoDB initialisation failed: {}", e))?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn mongo_store(_config: &StorageConfig) -> Result<Arc<dyn InvoiceStore>> {
    Err(anyhow!(
        "storage backend 'mongodb' requires the `mongodb_backend` feature"
    ))
}
