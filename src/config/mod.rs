//! Configuration loading and management
//!
//! Configuration is loaded once at startup and handed to each component's
//! constructor. Sources, later ones winning:
//!
//! 1. built-in defaults (a working in-memory setup)
//! 2. an optional YAML file
//! 3. `INVOICE_API_*` environment variables

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Prefix shared by all environment overrides
pub const ENV_PREFIX: &str = "INVOICE_API_";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix every route is nested under (e.g. "/api"); empty for none
    pub route_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            route_prefix: String::new(),
        }
    }
}

impl ServerConfig {
    /// Socket address string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Mongodb,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            other => Err(anyhow!("Unknown storage backend: {}", other)),
        }
    }
}

/// Document database settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub connection_string: String,
    pub database_name: String,
    pub collection_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            connection_string: "mongodb://localhost:27017".to_string(),
            database_name: "invoices".to_string(),
            collection_name: "invoices".to_string(),
        }
    }
}

/// Currency rate service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRateConfig {
    /// URL the base currency code is appended to
    pub service_url: String,
    pub timeout_secs: u64,
}

impl Default for ExchangeRateConfig {
    fn default() -> Self {
        Self {
            service_url: "https://api.freecurrencyapi.com/v1/latest?base_currency=".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub exchange_rates: ExchangeRateConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path, e))?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Defaults, then the optional file, then process environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `INVOICE_API_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| anyhow!("Invalid {}PORT '{}': {}", ENV_PREFIX, port, e))?;
        }
        if let Some(prefix) = var("ROUTE_PREFIX") {
            self.server.route_prefix = prefix;
        }
        if let Some(backend) = var("STORAGE_BACKEND") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(conn) = var("CONNECTION_STRING") {
            self.storage.connection_string = conn;
        }
        if let Some(db) = var("DATABASE_NAME") {
            self.storage.database_name = db;
        }
        if let Some(collection) = var("COLLECTION_NAME") {
            self.storage.collection_name = collection;
        }
        if let Some(url) = var("EXCHANGE_RATE_URL") {
            self.exchange_rates.service_url = url;
        }
        if let Some(timeout) = var("EXCHANGE_RATE_TIMEOUT_SECS") {
            self.exchange_rates.timeout_secs = timeout.parse().map_err(|e| {
                anyhow!(
                    "Invalid {}EXCHANGE_RATE_TIMEOUT_SECS '{}': {}",
                    ENV_PREFIX,
                    timeout,
                    e
                )
            })?;
        }

        Ok(self)
    }

    /// Reject settings no component can work with
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_name.is_empty() {
            return Err(anyhow!("storage.database_name must not be empty"));
        }
        if self.storage.collection_name.is_empty() {
            return Err(anyhow!("storage.collection_name must not be empty"));
        }
        if self.exchange_rates.service_url.is_empty() {
            return Err(anyhow!("exchange_rates.service_url must not be empty"));
        }
        if self.exchange_rates.timeout_secs == 0 {
            return Err(anyhow!("exchange_rates.timeout_secs must be positive"));
        }
        let prefix = &self.server.route_prefix;
        if !prefix.is_empty() && (!prefix.starts_with('/') || prefix.ends_with('/')) {
            return Err(anyhow!(
                "server.route_prefix must start with '/' and not end with one, got '{}'",
                prefix
            ));
        }
        Ok(())
    }
}
