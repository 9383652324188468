//! # HTTP Server
//!
//! Combines the guest API and the health check into one Axum server.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{guest_routes, health_routes, AppState};
use crate::config::AppConfig;
use crate::store::GuestStore;

/// Versioned prefix of the guest API
pub const API_PREFIX: &str = "/api/v1";

/// HTTP server for the guest API
pub struct HttpServer {
    config: AppConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: AppConfig, store: GuestStore) -> Self {
        let router = build_router(&config, store);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(addr = %listener.local_addr()?, prefix = API_PREFIX, "guestlist listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("server stopped");
        Ok(())
    }
}

/// Build the full router: guest API under [`API_PREFIX`], `/health` at the root.
pub fn build_router(config: &AppConfig, store: GuestStore) -> Router {
    let state = Arc::new(AppState::new(store));

    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(health_routes(state.clone()))
        .nest(API_PREFIX, guest_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_server_with_custom_port() {
        let store = GuestStore::in_memory().await.unwrap();
        let server = HttpServer::new(AppConfig::new("sqlite::memory:").with_port(8080), store);
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_router_builds_with_origins() {
        let store = GuestStore::in_memory().await.unwrap();
        let mut config = AppConfig::new("sqlite::memory:");
        config.cors_origins = vec!["http://localhost:5173".to_string()];
        let _router = build_router(&config, store);
    }
}
