//! API Routes
//!
//! Configures the Axum router with all catalog service endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    categories_handler, health_handler, invalidate_handler, most_popular_handler,
    new_arrivals_handler, products_handler, refresh_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin so the storefront UI can call it directly
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/products", get(products_handler))
        .route("/categories", get(categories_handler))
        .route("/new-arrivals", get(new_arrivals_handler))
        .route("/most-popular", get(most_popular_handler))
        .route("/refresh", post(refresh_handler))
        .route("/cache", delete(invalidate_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
