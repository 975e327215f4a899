//! Invoice service: sequence assignment, conversion on read, update invariants

use crate::core::{ExchangeRateProvider, Invoice, InvoiceError, InvoiceRequest, InvoiceStore};
use std::sync::Arc;
use uuid::Uuid;

/// How many numbers a create may reserve before giving up on conflicts
pub const MAX_CREATE_ATTEMPTS: usize = 3;

/// Orchestrates invoice operations over a store and a rate provider
///
/// Both collaborators are passed in at construction; the service holds no
/// other state and is cheap to clone.
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
    rates: Arc<dyn ExchangeRateProvider>,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>, rates: Arc<dyn ExchangeRateProvider>) -> Self {
        Self { store, rates }
    }

    /// All stored invoices; empty when there are none
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>, InvoiceError> {
        self.store.list_all().await
    }

    /// Fetch an invoice, optionally expressed in another currency
    ///
    /// The conversion only affects the returned copy; the stored record is
    /// left untouched.
    pub async fn get_invoice(
        &self,
        invoice_number: i64,
        target_currency: Option<&str>,
    ) -> Result<Invoice, InvoiceError> {
        let mut invoice = self
            .store
            .find_by_number(invoice_number)
            .await?
            .ok_or(InvoiceError::NotFound { invoice_number })?;

        if let Some(target) = target_currency
            && !target.eq_ignore_ascii_case(&invoice.currency)
        {
            invoice.amount = self
                .rates
                .convert(invoice.amount, &invoice.currency, target)
                .await?;
            invoice.currency = target.to_string();
        }

        Ok(invoice)
    }

    /// Create an invoice with a fresh storage id and the next invoice number
    ///
    /// A number taken concurrently by another create is retried with a newly
    /// reserved one.
    pub async fn create_invoice(&self, request: InvoiceRequest) -> Result<Invoice, InvoiceError> {
        request.check()?;

        let id = Uuid::new_v4();
        let mut last_err = None;

        for _ in 0..MAX_CREATE_ATTEMPTS {
            let invoice_number = self.store.next_invoice_number().await?;
            let invoice = request.clone().into_invoice(id, invoice_number);

            match self.store.insert(invoice.clone()).await {
                Ok(()) => {
                    tracing::info!(invoice_number, %id, "Invoice created");
                    return Ok(invoice);
                }
                Err(err @ InvoiceError::Conflict { .. }) => {
                    tracing::warn!(invoice_number, "Invoice number taken, retrying");
                    last_err = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        Err(last_err.unwrap_or_else(|| {
            InvoiceError::Internal("invoice creation made no attempt".to_string())
        }))
    }

    /// Replace an invoice's fields, keeping its `id` and invoice number
    pub async fn update_invoice(
        &self,
        invoice_number: i64,
        request: InvoiceRequest,
    ) -> Result<Invoice, InvoiceError> {
        let existing = self
            .store
            .find_by_number(invoice_number)
            .await?
            .ok_or(InvoiceError::NotFound { invoice_number })?;

        request.check()?;

        let updated = request.into_invoice(existing.id, existing.invoice_number);
        self.store
            .replace(existing.invoice_number, updated.clone())
            .await?;

        tracing::info!(invoice_number, "Invoice updated");
        Ok(updated)
    }
}
