//! Router builder for invoice routes

use crate::invoices::handlers::{
    InvoiceAppState, create_invoice, get_invoice, get_invoice_in_currency, list_invoices,
    update_invoice,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Build the invoice routes
///
/// - POST /Invoice - Create an invoice
/// - GET /Invoices - List all invoices
/// - GET /Invoice/{invoice_number} - Get an invoice
/// - GET /Invoice/{invoice_number}/{currency} - Get an invoice converted to `currency`
/// - PUT /Invoice/{invoice_number} - Replace an invoice's fields
pub fn build_invoice_routes(state: InvoiceAppState) -> Router {
    Router::new()
        .route("/Invoice", post(create_invoice))
        .route("/Invoices", get(list_invoices))
        .route(
            "/Invoice/{invoice_number}",
            get(get_invoice).put(update_invoice),
        )
        .route(
            "/Invoice/{invoice_number}/{currency}",
            get(get_invoice_in_currency),
        )
        .with_state(state)
}
