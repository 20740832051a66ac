// src/routes.rs

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{depop, health, vinted};
use crate::state::AppState;

/// Assembles the main application router.
///
/// * Merges the per-platform sub-routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (database pool + config).
pub fn create_router(state: AppState) -> Router {
    let vinted_routes = Router::new()
        .route("/scrape/vinted", post(vinted::scrape_vinted))
        .route("/vinted/users", get(vinted::list_vinted_users))
        .route("/vinted/users/{user_id}", get(vinted::get_vinted_user))
        .route("/vinted/products", get(vinted::list_vinted_products));

    let depop_routes = Router::new()
        .route("/scrape/depop", post(depop::scrape_depop))
        .route("/depop/users", get(depop::list_depop_users))
        .route("/depop/users/{user_id}", get(depop::get_depop_user))
        .route("/depop/products", get(depop::list_depop_products));

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .merge(vinted_routes)
        .merge(depop_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        // Demonstration service: any origin may read it.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
