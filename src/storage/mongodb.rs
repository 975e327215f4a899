//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoInvoiceStore`, an [`InvoiceStore`] backed by a single
//! collection whose name comes from configuration.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag.
//!
//! # Storage model
//!
//! Invoices are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. The storage identifier is stored as a
//! string `_id`; the business number lives in `invoiceId`, guarded by a unique
//! index.
//!
//! Sequence numbers come from a `counters` collection holding one document
//! per invoice collection, incremented atomically with `$inc`.

use crate::core::{Invoice, InvoiceError, InvoiceStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};
use uuid::Uuid;

/// Name of the collection holding sequence counters
pub const COUNTERS_COLLECTION: &str = "counters";

/// MongoDB duplicate key error code
const DUPLICATE_KEY: i32 = 11000;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert an invoice into a BSON document, adding its storage id as `_id`.
fn invoice_to_document(invoice: &Invoice) -> Result<Document, InvoiceError> {
    let json = serde_json::to_value(invoice)
        .map_err(|e| InvoiceError::Internal(format!("Failed to serialize invoice: {}", e)))?;
    let bson_val = mongodb::bson::to_bson(&json).map_err(|e| {
        InvoiceError::Internal(format!("Failed to convert JSON to BSON: {}", e))
    })?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(InvoiceError::Internal(
                "Expected BSON document, got non-object".to_string(),
            ));
        }
    };

    doc.insert("_id", invoice.id.to_string());
    Ok(doc)
}

/// Convert a BSON document back into an invoice, restoring `id` from `_id`.
fn document_to_invoice(mut doc: Document) -> Result<Invoice, InvoiceError> {
    let id = match doc.remove("_id") {
        Some(Bson::String(s)) => Uuid::parse_str(&s).map_err(|e| {
            InvoiceError::Internal(format!("Invalid invoice _id '{}': {}", s, e))
        })?,
        // Records written by other tools may carry ObjectIds; they still get
        // a stable identifier derived from the object id bytes.
        Some(Bson::ObjectId(oid)) => {
            let mut bytes = [0u8; 16];
            bytes[..12].copy_from_slice(&oid.bytes());
            Uuid::from_bytes(bytes)
        }
        _ => Uuid::nil(),
    };

    let json = Bson::Document(doc).into_relaxed_extjson();
    let mut invoice: Invoice = serde_json::from_value(json).map_err(|e| {
        InvoiceError::Internal(format!("Failed to deserialize invoice from document: {}", e))
    })?;
    invoice.id = id;
    Ok(invoice)
}

/// Read `invoiceId` without decoding the rest of the document
fn invoice_number_of(doc: &Document) -> Result<i64, InvoiceError> {
    match doc.get("invoiceId") {
        Some(Bson::Int64(n)) => Ok(*n),
        Some(Bson::Int32(n)) => Ok(i64::from(*n)),
        other => Err(InvoiceError::Persistence(format!(
            "Unreadable invoiceId {:?} in document {:?}",
            other,
            doc.get("_id")
        ))),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(e)) if e.code == DUPLICATE_KEY
    )
}

fn persistence(context: &str, err: mongodb::error::Error) -> InvoiceError {
    InvoiceError::Persistence(format!("{}: {}", context, err))
}

// ---------------------------------------------------------------------------
// MongoInvoiceStore
// ---------------------------------------------------------------------------

/// Invoice storage backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use invoice_api::storage::MongoInvoiceStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoInvoiceStore::new(client.database("invoices"), "invoices");
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoInvoiceStore {
    database: Database,
    collection_name: String,
}

impl MongoInvoiceStore {
    /// Create a new `MongoInvoiceStore` over `collection_name` in `database`.
    pub fn new(database: Database, collection_name: impl Into<String>) -> Self {
        Self {
            database,
            collection_name: collection_name.into(),
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<Document> {
        self.database.collection(&self.collection_name)
    }

    fn counters(&self) -> Collection<Document> {
        self.database.collection(COUNTERS_COLLECTION)
    }

    /// Create the unique `invoiceId` index and seed the sequence counter
    /// from the highest number already stored.
    ///
    /// This method is idempotent - safe to call on every startup.
    pub async fn ensure_indexes(&self) -> Result<(), InvoiceError> {
        let index = IndexModel::builder()
            .keys(doc! { "invoiceId": 1 })
            .options(
                mongodb::options::IndexOptions::builder()
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection()
            .create_index(index)
            .await
            .map_err(|e| persistence("Failed to create invoiceId index", e))?;

        let highest = match self
            .collection()
            .find_one(doc! {})
            .sort(doc! { "invoiceId": -1 })
            .await
            .map_err(|e| persistence("Failed to read highest invoiceId", e))?
        {
            Some(doc) => invoice_number_of(&doc)?,
            None => 0,
        };

        self.counters()
            .update_one(
                doc! { "_id": self.collection_name.as_str() },
                doc! { "$max": { "seq": highest } },
            )
            .upsert(true)
            .await
            .map_err(|e| persistence("Failed to seed invoice counter", e))?;

        tracing::info!(
            collection = %self.collection_name,
            highest,
            "Invoice indexes ready"
        );
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for MongoInvoiceStore {
    async fn list_all(&self) -> Result<Vec<Invoice>, InvoiceError> {
        let cursor = self
            .collection()
            .find(doc! {})
            .await
            .map_err(|e| persistence("Failed to list invoices", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| persistence("Failed to collect invoices", e))?;

        docs.into_iter().map(document_to_invoice).collect()
    }

    async fn find_by_number(&self, invoice_number: i64) -> Result<Option<Invoice>, InvoiceError> {
        let doc = self
            .collection()
            .find_one(doc! { "invoiceId": invoice_number })
            .await
            .map_err(|e| persistence("Failed to get invoice", e))?;

        doc.map(document_to_invoice).transpose()
    }

    async fn insert(&self, invoice: Invoice) -> Result<(), InvoiceError> {
        let doc = invoice_to_document(&invoice)?;

        match self.collection().insert_one(doc).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(InvoiceError::Conflict {
                invoice_number: invoice.invoice_number,
            }),
            Err(e) => Err(persistence("Failed to create invoice", e)),
        }
    }

    async fn replace(&self, invoice_number: i64, invoice: Invoice) -> Result<(), InvoiceError> {
        let doc = invoice_to_document(&invoice)?;

        let result = self
            .collection()
            .replace_one(doc! { "invoiceId": invoice_number }, doc)
            .await
            .map_err(|e| persistence("Failed to update invoice", e))?;

        if result.matched_count == 0 {
            return Err(InvoiceError::NotFound { invoice_number });
        }

        Ok(())
    }

    async fn next_invoice_number(&self) -> Result<i64, InvoiceError> {
        let counter = self
            .counters()
            .find_one_and_update(
                doc! { "_id": self.collection_name.as_str() },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| persistence("Failed to increment invoice counter", e))?
            .ok_or_else(|| InvoiceError::Persistence("Invoice counter missing".to_string()))?;

        match counter.get("seq") {
            Some(Bson::Int64(n)) => Ok(*n),
            Some(Bson::Int32(n)) => Ok(i64::from(*n)),
            other => Err(InvoiceError::Persistence(format!(
                "Invalid invoice counter value: {:?}",
                other
            ))),
        }
    }
}
