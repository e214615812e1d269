//! # Panelquote Server
//!
//! REST server for the Panelquote quoting service.
//!
//! ## Features
//!
//! - Quote computation and configuration read endpoints
//! - Admin endpoints for editing the persisted pricing configuration
//! - Shared-secret admin authentication via the `X-Admin-Token` header
//! - Configuration via TOML file
//!
//! ## Usage
//!
//! ```ignore
//! use panelquote_server::{Server, ServerConfig};
//!
//! let server = Server::new(config);
//! server.start().await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use panelquote_ext_file::{FileConfigStore, InMemoryPositionStore};

pub use config::ServerConfig;

/// The Panelquote server.
pub struct Server {
    config: ServerConfig,
}

impl Server {
    /// Create a new server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let store = Arc::new(FileConfigStore::new(&self.config.config_path));
        let positions = Arc::new(InMemoryPositionStore::new());

        routes::create_router_with_state(store, positions, self.config.effective_admin_token())
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Start the server.
    pub async fn start(&self) -> Result<(), std::io::Error> {
        let addr = SocketAddr::new(
            self.config.host.parse().unwrap_or([0, 0, 0, 0].into()),
            self.config.port,
        );

        info!("Starting Panelquote server on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router()).await
    }
}
