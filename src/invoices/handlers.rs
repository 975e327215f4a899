//! Invoice HTTP handlers
//!
//! Each handler parses its input, calls the service and maps the outcome to
//! a status code. Errors are turned into bare status codes by
//! [`InvoiceError`]'s `IntoResponse` impl, which also logs them.

use super::extractor::InvoiceBody;
use super::service::InvoiceService;
use crate::core::{Invoice, InvoiceError, InvoiceRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

/// Invoice-specific AppState
#[derive(Clone)]
pub struct InvoiceAppState {
    pub service: InvoiceService,
}

/// POST /Invoice - 201 with no body
pub async fn create_invoice(
    State(state): State<InvoiceAppState>,
    InvoiceBody(payload): InvoiceBody<InvoiceRequest>,
) -> Result<StatusCode, InvoiceError> {
    state.service.create_invoice(payload).await?;
    Ok(StatusCode::CREATED)
}

/// GET /Invoices - 200 with every invoice, `[]` when there are none
pub async fn list_invoices(
    State(state): State<InvoiceAppState>,
) -> Result<Json<Vec<Invoice>>, InvoiceError> {
    let invoices = state.service.list_invoices().await?;
    Ok(Json(invoices))
}

/// GET /Invoice/{invoice_number}
pub async fn get_invoice(
    State(state): State<InvoiceAppState>,
    Path(invoice_number): Path<i64>,
) -> Result<Json<Invoice>, InvoiceError> {
    let invoice = state.service.get_invoice(invoice_number, None).await?;
    Ok(Json(invoice))
}

/// GET /Invoice/{invoice_number}/{currency} - amount converted to `currency`
pub async fn get_invoice_in_currency(
    State(state): State<InvoiceAppState>,
    Path((invoice_number, currency)): Path<(i64, String)>,
) -> Result<Json<Invoice>, InvoiceError> {
    let invoice = state
        .service
        .get_invoice(invoice_number, Some(&currency))
        .await?;
    Ok(Json(invoice))
}

/// PUT /Invoice/{invoice_number} - 202 with no body
pub async fn update_invoice(
    State(state): State<InvoiceAppState>,
    Path(invoice_number): Path<i64>,
    InvoiceBody(payload): InvoiceBody<InvoiceRequest>,
) -> Result<StatusCode, InvoiceError> {
    state
        .service
        .update_invoice(invoice_number, payload)
        .await?;
    Ok(StatusCode::ACCEPTED)
}
