//! Server module for building the HTTP server
//!
//! `ServerBuilder` wires the invoice routes, request tracing and CORS, and
//! serves them with graceful shutdown.

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::build_invoice_routes;
