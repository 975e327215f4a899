//! Shared test harness for storage backend testing
//!
//! Provides invoice fixtures and the `invoice_store_tests!` macro, which
//! generates the `InvoiceStore` contract suite for any backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//!
//! invoice_store_tests!(InMemoryInvoiceStore::new());
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod store_tests;

use invoice_api::core::Invoice;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

/// Build an invoice with the given number and amount
pub fn make_invoice(invoice_number: i64, amount: &str, currency: &str) -> Invoice {
    Invoice {
        id: Uuid::new_v4(),
        invoice_number,
        supplier: format!("Supplier {}", invoice_number),
        date_issued: "2021-03-01".to_string(),
        amount: Decimal::from_str(amount).expect("valid decimal literal"),
        description: format!("Invoice #{}", invoice_number),
        currency: currency.to_string(),
    }
}
