//! Invoice model and client payload

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::InvoiceError;

/// A billing record identified in business terms by its invoice number.
///
/// The storage identifier (`id`) is never part of the HTTP contract: it is
/// skipped by serde and carried by the storage backends themselves (as `_id`
/// in MongoDB).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Storage identifier, assigned once on creation
    #[serde(skip)]
    pub id: Uuid,

    /// Sequential business number, exposed as `invoiceId`
    #[serde(rename = "invoiceId")]
    pub invoice_number: i64,

    pub supplier: String,

    pub date_issued: String,

    /// Amount expressed in `currency`
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    pub description: String,

    pub currency: String,
}

/// Payload accepted by the create and update endpoints.
///
/// An `invoiceId` present in the body is accepted and ignored: numbers are
/// always assigned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    #[serde(rename = "invoiceId", default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<i64>,

    #[serde(default)]
    pub supplier: String,

    #[serde(default)]
    pub date_issued: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = non_negative))]
    pub amount: Decimal,

    #[serde(default)]
    pub description: String,

    #[validate(length(min = 1, message = "currency must not be empty"))]
    pub currency: String,
}

fn non_negative(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("amount must not be negative".into());
        return Err(err);
    }
    Ok(())
}

impl InvoiceRequest {
    /// Validate the payload, mapping failures to [`InvoiceError::Validation`]
    pub fn check(&self) -> Result<(), InvoiceError> {
        self.validate()
            .map_err(|e| InvoiceError::Validation(e.to_string()))
    }

    /// Build the stored record from this payload.
    ///
    /// `id` and `invoice_number` always come from the caller, never from the
    /// payload.
    pub fn into_invoice(self, id: Uuid, invoice_number: i64) -> Invoice {
        Invoice {
            id,
            invoice_number,
            supplier: self.supplier,
            date_issued: self.date_issued,
            amount: self.amount,
            description: self.description,
            currency: self.currency,
        }
    }
}
