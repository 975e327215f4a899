//! Storage implementations for different backends

#[cfg(feature = "in-memory")]
pub mod in_memory;
#[cfg(feature = "mongodb_backend")]
pub mod mongodb;

#[cfg(feature = "in-memory")]
pub use in_memory::InMemoryInvoiceStore;
#[cfg(feature = "mongodb_backend")]
pub use self::mongodb::MongoInvoiceStore;
