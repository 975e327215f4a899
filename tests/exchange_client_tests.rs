//! Integration tests for HttpExchangeRateClient
//!
//! These tests spin up a real HTTP rate service on an ephemeral port and
//! point the client at it.

use axum::{
    Json, Router,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use invoice_api::config::ExchangeRateConfig;
use invoice_api::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;

/// Rate service: USD has EUR/GBP rates, MIXED carries one rate too large for a
/// decimal, SLOW hangs, anything else is a 404
async fn latest(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("base_currency").map(String::as_str) {
        Some("USD") => Json(json!({ "data": { "EUR": 0.92, "GBP": 0.7915 } })).into_response(),
        Some("MIXED") => Json(json!({ "data": { "EUR": 0.5, "HUGE": 1e30 } })).into_response(),
        Some("BAD") => (StatusCode::OK, "not json").into_response(),
        Some("SLOW") => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "data": {} })).into_response()
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Helper: start the rate service and return its address
async fn start_rate_service() -> SocketAddr {
    let app = Router::new().route("/latest", get(latest));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr) -> HttpExchangeRateClient {
    let config = ExchangeRateConfig {
        service_url: format!("http://{}/latest?base_currency=", addr),
        timeout_secs: 5,
    };
    HttpExchangeRateClient::from_config(&config).unwrap()
}

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[tokio::test]
async fn test_rates_are_parsed_exactly() {
    let client = client_for(start_rate_service().await);

    let rates = client.rates("USD").await.unwrap();

    assert_eq!(rates.len(), 2);
    assert_eq!(rates["EUR"], dec("0.92"));
    assert_eq!(rates["GBP"], dec("0.7915"));
}

#[tokio::test]
async fn test_convert_rounds_to_cents() {
    let client = client_for(start_rate_service().await);

    assert_eq!(client.convert(dec("100"), "USD", "EUR").await.unwrap(), dec("92.00"));
    // 10 * 0.7915 = 7.915 → half to even → 7.92
    assert_eq!(client.convert(dec("10"), "usd", "gbp").await.unwrap(), dec("7.92"));
}

#[tokio::test]
async fn test_unusable_entry_does_not_block_other_targets() {
    let client = client_for(start_rate_service().await);

    assert_eq!(client.convert(dec("10"), "MIXED", "EUR").await.unwrap(), dec("5.00"));

    let err = client.convert(dec("10"), "MIXED", "HUGE").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}

#[tokio::test]
async fn test_missing_target_is_unavailable() {
    let client = client_for(start_rate_service().await);

    let err = client.convert(dec("1"), "USD", "JPY").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}

#[tokio::test]
async fn test_error_status_is_unavailable() {
    let client = client_for(start_rate_service().await);

    let err = client.rates("XXX").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}

#[tokio::test]
async fn test_malformed_body_is_unavailable() {
    let client = client_for(start_rate_service().await);

    let err = client.rates("BAD").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}

#[tokio::test]
async fn test_timeout_is_unavailable() {
    let addr = start_rate_service().await;
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let client = HttpExchangeRateClient::with_client(
        http,
        format!("http://{}/latest?base_currency=", addr),
    );

    let err = client.rates("SLOW").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_unavailable() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).rates("USD").await.unwrap_err();
    assert!(matches!(err, InvoiceError::ExchangeRateUnavailable(_)));
}
