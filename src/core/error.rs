//! Typed error handling for invoice operations
//!
//! Every failure in the service layer is an [`InvoiceError`]. Handlers return
//! it directly and the [`IntoResponse`] impl maps it to a bare status code:
//!
//! - [`InvoiceError::NotFound`] → 404
//! - everything else, including an unreadable or invalid payload → 500
//!
//! Error details are logged server-side and never written to the response
//! body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// The error type for invoice operations
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// No invoice carries the requested number
    #[error("invoice with invoiceId {invoice_number} was not found")]
    NotFound { invoice_number: i64 },

    /// The client payload could not be parsed or failed validation
    #[error("invalid invoice payload: {0}")]
    Validation(String),

    /// The rate service could not produce a usable rate
    #[error("exchange rate unavailable: {0}")]
    ExchangeRateUnavailable(String),

    /// The storage backend failed to read or write
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The invoice number is already taken by another record
    #[error("invoiceId {invoice_number} is already taken")]
    Conflict { invoice_number: i64 },

    /// Unexpected fault
    #[error("internal error: {0}")]
    Internal(String),
}

impl InvoiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            InvoiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InvoiceError::Validation(_)
            | InvoiceError::ExchangeRateUnavailable(_)
            | InvoiceError::Persistence(_)
            | InvoiceError::Conflict { .. }
            | InvoiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            InvoiceError::NotFound { .. } => "INVOICE_NOT_FOUND",
            InvoiceError::Validation(_) => "VALIDATION_ERROR",
            InvoiceError::ExchangeRateUnavailable(_) => "EXCHANGE_RATE_UNAVAILABLE",
            InvoiceError::Persistence(_) => "PERSISTENCE_ERROR",
            InvoiceError::Conflict { .. } => "INVOICE_NUMBER_CONFLICT",
            InvoiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InvoiceError::NotFound { .. })
    }
}

impl IntoResponse for InvoiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), "Internal Server Error: {}", self);
        } else {
            tracing::warn!(code = self.error_code(), "{}", self);
        }
        status.into_response()
    }
}

impl From<JsonRejection> for InvoiceError {
    fn from(rejection: JsonRejection) -> Self {
        InvoiceError::Validation(rejection.body_text())
    }
}

impl From<anyhow::Error> for InvoiceError {
    fn from(err: anyhow::Error) -> Self {
        InvoiceError::Internal(err.to_string())
    }
}
