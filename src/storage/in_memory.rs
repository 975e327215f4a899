//! In-memory implementation of InvoiceStore for testing and development

use crate::core::service::next_after;
use crate::core::{Invoice, InvoiceError, InvoiceStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

/// In-memory invoice store
///
/// Records are keyed by invoice number, which enforces uniqueness. Uses
/// RwLock for thread-safe access; the sequence counter sits behind its own
/// Mutex so concurrent creates never receive the same number.
#[derive(Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<i64, Invoice>>>,
    last_number: Arc<Mutex<i64>>,
}

impl InMemoryInvoiceStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            invoices: Arc::new(RwLock::new(HashMap::new())),
            last_number: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of stored invoices
    pub fn len(&self) -> usize {
        self.invoices.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryInvoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::Persistence(format!("Failed to acquire lock: {}", e))
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn list_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
        let invoices = self.invoices.read().map_err(lock_error)?;
        Ok(invoices.values().cloned().collect())
    }

    async fn find_by_number(&self, invoice_number: i64) -> Result<Option<Invoice>, InvoiceError> {
        let invoices = self.invoices.read().map_err(lock_error)?;
        Ok(invoices.get(&invoice_number).cloned())
    }

    async fn insert(&self, invoice: Invoice) -> Result<(), InvoiceError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        if invoices.contains_key(&invoice.invoice_number) {
            return Err(InvoiceError::Conflict {
                invoice_number: invoice.invoice_number,
            });
        }

        invoices.insert(invoice.invoice_number, invoice);
        Ok(())
    }

    async fn replace(&self, invoice_number: i64, invoice: Invoice) -> Result<(), InvoiceError> {
        let mut invoices = self.invoices.write().map_err(lock_error)?;

        let slot = invoices
            .get_mut(&invoice_number)
            .ok_or(InvoiceError::NotFound { invoice_number })?;
        *slot = invoice;

        Ok(())
    }

    /// Counter reconciled with the stored max, so records inserted with
    /// explicit numbers are never handed out again.
    async fn next_invoice_number(&self) -> Result<i64, InvoiceError> {
        let mut last = self.last_number.lock().map_err(lock_error)?;
        let stored_next = {
            let invoices = self.invoices.read().map_err(lock_error)?;
            next_after(invoices.keys().copied())
        };

        *last = stored_next.max(*last + 1);
        Ok(*last)
    }
}
