//! HTTP exchange rate client
//!
//! Looks up conversion rates from a third-party currency service. The request
//! URL is the configured service URL with the base currency code appended,
//! e.g. `https://api.freecurrencyapi.com/v1/latest?apikey=KEY&base_currency=`
//! + `USD`. The service answers with a map of currency code to rate:
//!
//! ```json
//! { "data": { "EUR": 0.92, "GBP": 0.79 } }
//! ```

use crate::config::ExchangeRateConfig;
use crate::core::{ExchangeRateProvider, InvoiceError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

/// Rate service response body
#[derive(Debug, Deserialize)]
struct RatesResponse {
    data: HashMap<String, serde_json::Number>,
}

/// Exchange rate provider backed by a pooled `reqwest::Client`
///
/// Rates are never cached: every conversion is one outbound call.
#[derive(Clone, Debug)]
pub struct HttpExchangeRateClient {
    client: reqwest::Client,
    service_url: String,
}

impl HttpExchangeRateClient {
    /// Build a client from configuration, applying the request timeout
    pub fn from_config(config: &ExchangeRateConfig) -> Result<Self, InvoiceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InvoiceError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config.service_url.clone()))
    }

    /// Use an existing client, e.g. one shared with other components
    pub fn with_client(client: reqwest::Client, service_url: impl Into<String>) -> Self {
        Self {
            client,
            service_url: service_url.into(),
        }
    }

    fn url_for(&self, base_currency: &str) -> String {
        format!("{}{}", self.service_url, base_currency)
    }
}

fn unavailable(base_currency: &str, err: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::ExchangeRateUnavailable(format!("rates for {}: {}", base_currency, err))
}

/// Parse a JSON number into a decimal without going through f64
fn number_to_decimal(number: &serde_json::Number) -> Option<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[async_trait]
impl ExchangeRateProvider for HttpExchangeRateClient {
    async fn rates(&self, base_currency: &str) -> Result<HashMap<String, Decimal>, InvoiceError> {
        let url = self.url_for(base_currency);
        tracing::debug!(base_currency, "Fetching exchange rates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(base_currency, e))?;

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| unavailable(base_currency, e))?;

        Ok(collect_rates(base_currency, body.data))
    }
}

/// Keep every rate representable as a `Decimal`, keyed by upper-case code
///
/// Unusable entries are dropped; a conversion only fails when its own target
/// is missing.
fn collect_rates(
    base_currency: &str,
    data: HashMap<String, serde_json::Number>,
) -> HashMap<String, Decimal> {
    data.into_iter()
        .filter_map(|(code, rate)| match number_to_decimal(&rate) {
            Some(rate) => Some((code.to_ascii_uppercase(), rate)),
            None => {
                tracing::warn!(base_currency, currency = %code, %rate, "Skipping unusable rate");
                None
            }
        })
        .collect()
}
