use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{self, AppState};
use super::static_files::static_handler;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/usage", get(handlers::get_usage))
        .route("/usage/comparison", get(handlers::get_usage_comparison))
        .route("/sessions", get(handlers::get_sessions))
        // Health check
        .route("/health", get(handlers::health_check));

    // CORS layer so the dashboard can be developed against a live server
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Combine routes
    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}
