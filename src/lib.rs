//! # Invoice API
//!
//! An HTTP API for invoice records: create, list, fetch by invoice number
//! (optionally converted to another currency), and update.
//!
//! ## Features
//!
//! - **Sequential numbering**: every invoice gets the next `invoiceId`,
//!   reserved atomically by the store and guarded against duplicates
//! - **Conversion on read**: `GET /Invoice/{n}/{currency}` converts the amount
//!   through an external rate service, rounding half to even to cents
//! - **Pluggable storage**: in-memory (default) or MongoDB (`mongodb_backend`)
//! - **Explicit wiring**: configuration, store and rate client are built once
//!   and passed down by constructor
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_api::prelude::*;
//!
//! let config = AppConfig::load(None)?;
//! let store = Arc::new(InMemoryInvoiceStore::new());
//! let rates = Arc::new(HttpExchangeRateClient::from_config(&config.exchange_rates)?);
//!
//! ServerBuilder::new(config.server.clone())
//!     .with_service(InvoiceService::new(store, rates))
//!     .serve()
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod exchange;
pub mod invoices;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        ExchangeRateProvider, Invoice, InvoiceError, InvoiceRequest, InvoiceStore,
    };

    // === Services ===
    pub use crate::exchange::HttpExchangeRateClient;
    pub use crate::invoices::{InvoiceAppState, InvoiceService};

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoInvoiceStore;

    // === Config ===
    pub use crate::config::{AppConfig, ExchangeRateConfig, ServerConfig, StorageBackend, StorageConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
