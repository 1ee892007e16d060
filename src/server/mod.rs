//! HTTP server exposing the paper search API.

pub mod handlers;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, Config};
use crate::service::PaperService;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: PaperService,
    pub app: AppConfig,
    pub cors_origins: Vec<String>,
}

impl AppState {
    pub fn new(service: PaperService, config: &Config) -> Self {
        Self {
            service,
            app: config.app.clone(),
            cors_origins: config.server.cors_origins.clone(),
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.cors_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/v1/papers/search", post(handlers::search_papers))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for the configured origins, with credentials and any method or header
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
                None
            }
        })
        .collect();

    // Credentials rule out wildcard methods and headers
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Start the server and run until Ctrl-C
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Paper Glimpse listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
