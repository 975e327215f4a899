//! Service traits for invoice persistence and exchange rates

use crate::core::error::InvoiceError;
use crate::core::invoice::Invoice;
use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// Number of decimal places kept on converted amounts
pub const CONVERTED_AMOUNT_SCALE: u32 = 2;

/// Persistence trait for invoice records
///
/// Implementations operate on a single collection of invoices. The service
/// layer is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// List all invoices, in no particular order
    async fn list_all(&self) -> Result<Vec<Invoice>, InvoiceError>;

    /// Get an invoice by its invoice number
    async fn find_by_number(&self, invoice_number: i64) -> Result<Option<Invoice>, InvoiceError>;

    /// Persist a new invoice
    ///
    /// Fails with [`InvoiceError::Conflict`] when another record already holds
    /// the same invoice number.
    async fn insert(&self, invoice: Invoice) -> Result<(), InvoiceError>;

    /// Overwrite the invoice holding `invoice_number` with the full record
    ///
    /// Fails with [`InvoiceError::NotFound`] when no record matches.
    async fn replace(&self, invoice_number: i64, invoice: Invoice) -> Result<(), InvoiceError>;

    /// Reserve the next invoice number
    ///
    /// The default scans the whole collection (max + 1, or 1 when empty).
    /// Backends with an atomic increment primitive should override it.
    async fn next_invoice_number(&self) -> Result<i64, InvoiceError> {
        let invoices = self.list_all().await?;
        Ok(next_after(invoices.iter().map(|i| i.invoice_number)))
    }
}

/// Next number in the sequence given the numbers already in use
pub fn next_after(numbers: impl IntoIterator<Item = i64>) -> i64 {
    numbers.into_iter().max().map_or(1, |max| max + 1)
}

/// Source of currency conversion rates
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Fetch the rates for `base_currency`, keyed by upper-case currency code
    async fn rates(&self, base_currency: &str) -> Result<HashMap<String, Decimal>, InvoiceError>;

    /// Convert `amount` from `base_currency` to `target_currency`
    ///
    /// Performs exactly one rate lookup. A target missing from the rate table
    /// is an error, never a pass-through of the unconverted amount.
    async fn convert(
        &self,
        amount: Decimal,
        base_currency: &str,
        target_currency: &str,
    ) -> Result<Decimal, InvoiceError> {
        let rates = self.rates(&base_currency.to_ascii_uppercase()).await?;
        let target = target_currency.to_ascii_uppercase();
        let rate = rates.get(&target).ok_or_else(|| {
            InvoiceError::ExchangeRateUnavailable(format!(
                "no {} rate for base currency {}",
                target, base_currency
            ))
        })?;
        apply_rate(amount, *rate)
    }
}

/// Multiply by `rate` and round to cents, half to even
///
/// A product outside the `Decimal` range is an [`InvoiceError::Internal`].
pub fn apply_rate(amount: Decimal, rate: Decimal) -> Result<Decimal, InvoiceError> {
    amount
        .checked_mul(rate)
        .map(|converted| {
            converted.round_dp_with_strategy(
                CONVERTED_AMOUNT_SCALE,
                RoundingStrategy::MidpointNearestEven,
            )
        })
        .ok_or_else(|| {
            InvoiceError::Internal(format!(
                "converting {} at rate {} overflows",
                amount, rate
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    struct FixedRates(HashMap<String, Decimal>);

    #[async_trait]
    impl ExchangeRateProvider for FixedRates {
        async fn rates(&self, _base: &str) -> Result<HashMap<String, Decimal>, InvoiceError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn next_after_empty_starts_at_one() {
        assert_eq!(next_after(Vec::new()), 1);
    }

    #[test]
    fn next_after_uses_max_not_count() {
        assert_eq!(next_after([3, 9, 4]), 10);
    }

    #[test]
    fn apply_rate_rounds_to_two_places() {
        assert_eq!(apply_rate(dec("100"), dec("0.92")).unwrap(), dec("92.00"));
        assert_eq!(apply_rate(dec("10"), dec("0.333333")).unwrap(), dec("3.33"));
    }

    #[test]
    fn apply_rate_overflow_is_an_error() {
        let err = apply_rate(Decimal::MAX, dec("2")).unwrap_err();
        assert!(matches!(err, InvoiceError::Internal(_)));
    }

    #[test]
    fn apply_rate_rounds_half_to_even() {
        assert_eq!(apply_rate(dec("0.125"), Decimal::ONE).unwrap(), dec("0.12"));
        assert_eq!(apply_rate(dec("0.135"), Decimal::ONE).unwrap(), dec("0.14"));
        assert_eq!(apply_rate(dec("-0.125"), Decimal::ONE).unwrap(), dec("-0.12"));
    }

    #[tokio::test]
    async fn convert_uses_target_rate_case_insensitively() {
        let provider = FixedRates(HashMap::from([("EUR".to_string(), dec("0.92"))]));
        let converted = provider.convert(dec("100"), "usd", "eur").await.unwrap();
        assert_eq!(converted, dec("92.00"));
    }

    #[tokio::test]
    async fn convert_fails_when_target_missing() {
        let provider = FixedRates(HashMap::from([("EUR".to_string(), dec("0.92"))]));
        let err = provider.convert(dec("100"), "USD", "GBP").await.unwrap_err();
        assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
    }

    #[tokio::test]
    async fn convert_overflow_is_an_error() {
        let provider = FixedRates(HashMap::from([("MXN".to_string(), dec("20"))]));
        let err = provider
            .convert(dec("70000000000000000000000000000"), "USD", "MXN")
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::Internal(_)));
    }
}
