//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap a service router with the shared middleware stack
//! - Wire up tracing, request IDs, timeouts, and body limits
//! - Serve with graceful shutdown on Ctrl+C

use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::schema::TimeoutConfig;
use crate::http::request::MakeRequestUuid;

/// Cap on inbound body size; contract sources are small text files.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP server shared by all three relay services.
pub struct HttpServer {
    name: &'static str,
    app: Router,
}

impl HttpServer {
    /// Wrap a service router with the shared middleware stack.
    pub fn new(name: &'static str, router: Router, timeouts: &TimeoutConfig) -> Self {
        let app = router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(TimeoutLayer::new(Duration::from_secs(timeouts.request_secs))),
        );
        Self { name, app }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(service = self.name, address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!(service = self.name, "HTTP server stopped");
        Ok(())
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
