//! HTTP server for Lexis.
//!
//! Serves the translation and fine-tuning endpoints used by the editing UI.

mod error;
pub mod handlers;
pub mod logging;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::services::Services;
use logging::RequestLoggerLayer;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

/// Build the application router.
///
/// Each known path answers other methods with a JSON 405.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/models",
            get(handlers::list_models).fallback(handlers::method_not_allowed),
        )
        .route(
            "/train-status",
            get(handlers::train_status).fallback(handlers::method_not_allowed),
        )
        .route(
            "/train",
            post(handlers::train).fallback(handlers::method_not_allowed),
        )
        .route(
            "/translate",
            post(handlers::translate).fallback(handlers::method_not_allowed),
        )
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .layer(TraceLayer::new_for_http())
        .layer(RequestLoggerLayer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the Lexis HTTP server and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the remote clients cannot be configured or the server
/// fails to bind to the configured address.
pub async fn run(config: &Config) -> Result<()> {
    let services = Services::from_config(config)?;
    let router = build_router(AppState::new(services));

    let listener = tokio::net::TcpListener::bind(config.server.address).await?;
    info!(address = %config.server.address, "Starting Lexis HTTP server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
