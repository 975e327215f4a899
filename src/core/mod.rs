//! Core module containing the invoice model, error type and service traits

pub mod error;
pub mod invoice;
pub mod service;

pub use error::InvoiceError;
pub use invoice::{Invoice, InvoiceRequest};
pub use service::{ExchangeRateProvider, InvoiceStore};
