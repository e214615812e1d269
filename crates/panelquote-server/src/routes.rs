//! Route definitions.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;

use panelquote_ext_file::{FileConfigStore, InMemoryPositionStore};

use crate::handlers::{self, AppState};

/// Create the API router with a store and an open admin surface.
///
/// # Arguments
/// * `store` - The persisted pricing configuration store
pub fn create_router(store: Arc<FileConfigStore>) -> Router {
    create_router_with_state(store, Arc::new(InMemoryPositionStore::new()), None)
}

/// Create the API router.
///
/// # Arguments
/// * `store` - The persisted pricing configuration store
/// * `positions` - The ephemeral position override store
/// * `admin_token` - Shared admin secret; `None` leaves admin routes open
pub fn create_router_with_state(
    store: Arc<FileConfigStore>,
    positions: Arc<InMemoryPositionStore>,
    admin_token: Option<String>,
) -> Router {
    let state = Arc::new(AppState {
        store,
        positions,
        admin_token,
    });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Quoting
        .route("/api/v1/quote/config", get(handlers::get_quote_config))
        .route("/api/v1/quote/compute", post(handlers::compute_quote))
        // Admin: configuration
        .route("/api/v1/admin/reload", post(handlers::reload_config))
        .route("/api/v1/admin/variables", put(handlers::update_variables))
        .route("/api/v1/admin/prices", put(handlers::update_prices))
        .route("/api/v1/admin/base", post(handlers::save_base))
        // Admin: category CRUD
        .route("/api/v1/admin/categories", get(handlers::list_categories))
        .route(
            "/api/v1/admin/categories/:id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        // Admin: ephemeral position overrides
        .route(
            "/api/v1/admin/positions",
            get(handlers::list_positions).post(handlers::upsert_position),
        )
        .route("/api/v1/admin/positions/:name", delete(handlers::delete_position))
        // State
        .with_state(state)
}
