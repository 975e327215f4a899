//! Axum extractor for invoice request bodies
//!
//! `InvoiceBody<T>` behaves like `Json<T>` but rejects with an
//! [`InvoiceError`], so a malformed, incomplete or mistyped body goes through
//! the same logging and status mapping as every other failure.

use crate::core::InvoiceError;
use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON body whose rejection is an [`InvoiceError`]
///
/// ```rust,ignore
/// pub async fn create_invoice(
///     State(state): State<InvoiceAppState>,
///     InvoiceBody(payload): InvoiceBody<InvoiceRequest>,
/// ) -> Result<StatusCode, InvoiceError> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceBody<T>(pub T);

impl<S, T> FromRequest<S> for InvoiceBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = InvoiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        Ok(InvoiceBody(payload))
    }
}
