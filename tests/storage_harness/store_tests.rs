//! Macro-generated test suite for `InvoiceStore` contract validation.
//!
//! # Generated Tests
//!
//! - `test_list_empty` - list on empty store returns empty vec
//! - `test_insert_and_find` - insert then find by number, all fields intact
//! - `test_find_nonexistent` - unknown number returns None
//! - `test_list_multiple` - insert 5, list returns all 5
//! - `test_insert_duplicate_number` - second insert with same number conflicts
//! - `test_replace_existing` - replace overwrites every field
//! - `test_replace_nonexistent` - replace unknown number returns NotFound
//! - `test_next_number_empty` - empty store hands out 1
//! - `test_next_number_after_inserts` - next follows the stored max
//! - `test_next_number_concurrent` - parallel reservations are distinct

/// Generate a full `InvoiceStore` conformance test suite.
///
/// `$factory` is re-evaluated for each test to ensure isolation. For the
/// concurrent test the returned store must also be `Clone + 'static`.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use invoice_api::core::{InvoiceError, InvoiceStore};
            use rust_decimal::Decimal;
            use std::str::FromStr;

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                let all = store.list_all().await.unwrap();
                assert!(all.is_empty());
            }

            #[tokio::test]
            async fn test_insert_and_find() {
                let store = $factory;
                let invoice = make_invoice(1, "100.25", "USD");

                store.insert(invoice.clone()).await.unwrap();
                let found = store.find_by_number(1).await.unwrap().unwrap();

                assert_eq!(found, invoice);
                assert_eq!(found.amount, Decimal::from_str("100.25").unwrap());
            }

            #[tokio::test]
            async fn test_find_nonexistent() {
                let store = $factory;
                store.insert(make_invoice(1, "1", "USD")).await.unwrap();

                assert!(store.find_by_number(2).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let store = $factory;
                for n in 1..=5 {
                    store.insert(make_invoice(n, "10", "EUR")).await.unwrap();
                }

                let mut numbers: Vec<i64> = store
                    .list_all()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|i| i.invoice_number)
                    .collect();
                numbers.sort_unstable();
                assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
            }

            #[tokio::test]
            async fn test_insert_duplicate_number() {
                let store = $factory;
                store.insert(make_invoice(3, "1", "USD")).await.unwrap();

                let err = store.insert(make_invoice(3, "2", "USD")).await.unwrap_err();
                assert!(matches!(err, InvoiceError::Conflict { invoice_number: 3 }));

                let kept = store.find_by_number(3).await.unwrap().unwrap();
                assert_eq!(kept.amount, Decimal::from(1));
            }

            #[tokio::test]
            async fn test_replace_existing() {
                let store = $factory;
                let original = make_invoice(1, "100", "USD");
                store.insert(original.clone()).await.unwrap();

                let mut replacement = make_invoice(1, "42.10", "GBP");
                replacement.id = original.id;
                replacement.supplier = "Replaced".to_string();
                store.replace(1, replacement.clone()).await.unwrap();

                let found = store.find_by_number(1).await.unwrap().unwrap();
                assert_eq!(found, replacement);
                assert_eq!(store.list_all().await.unwrap().len(), 1);
            }

            #[tokio::test]
            async fn test_replace_nonexistent() {
                let store = $factory;
                let err = store
                    .replace(9, make_invoice(9, "1", "USD"))
                    .await
                    .unwrap_err();
                assert!(matches!(err, InvoiceError::NotFound { invoice_number: 9 }));
                assert!(store.list_all().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_next_number_empty() {
                let store = $factory;
                assert_eq!(store.next_invoice_number().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_next_number_after_inserts() {
                let store = $factory;
                for n in 1..=3 {
                    let reserved = store.next_invoice_number().await.unwrap();
                    assert_eq!(reserved, n);
                    store.insert(make_invoice(reserved, "1", "USD")).await.unwrap();
                }
                assert_eq!(store.next_invoice_number().await.unwrap(), 4);
            }

            #[tokio::test]
            async fn test_next_number_concurrent() {
                let store = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|_| {
                        let store = store.clone();
                        tokio::spawn(async move { store.next_invoice_number().await.unwrap() })
                    })
                    .collect();

                let mut numbers = Vec::new();
                for handle in handles {
                    numbers.push(handle.await.unwrap());
                }
                numbers.sort_unstable();
                numbers.dedup();
                assert_eq!(numbers.len(), 10);
            }
        }
    };
}
