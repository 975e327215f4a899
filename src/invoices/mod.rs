//! Invoice service and HTTP surface

pub mod extractor;
pub mod handlers;
pub mod service;

pub use extractor::InvoiceBody;
pub use handlers::InvoiceAppState;
pub use service::InvoiceService;
