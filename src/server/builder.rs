//! ServerBuilder for fluent API to build the HTTP server

use super::router::build_invoice_routes;
use crate::config::ServerConfig;
use crate::invoices::{InvoiceAppState, InvoiceService};
use anyhow::{Result, anyhow};
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the invoice HTTP server
///
/// # Example
///
/// ```ignore
/// let service = InvoiceService::new(store, rates);
///
/// ServerBuilder::new(config.server.clone())
///     .with_service(service)
///     .serve()
///     .await?;
/// ```
pub struct ServerBuilder {
    config: ServerConfig,
    service: Option<InvoiceService>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            service: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the invoice service (required)
    pub fn with_service(mut self, service: InvoiceService) -> Self {
        self.service = Some(service);
        self
    }

    /// Add routes next to the invoice routes, e.g. a health check
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let service = self
            .service
            .ok_or_else(|| anyhow!("InvoiceService is required. Call .with_service()"))?;

        let mut routes = build_invoice_routes(InvoiceAppState { service });
        for custom in self.custom_routes {
            routes = routes.merge(custom);
        }

        let app = if self.config.route_prefix.is_empty() {
            routes
        } else {
            Router::new().nest(&self.config.route_prefix, routes)
        };

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the configured address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self) -> Result<()> {
        let addr = self.config.addr();
        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
