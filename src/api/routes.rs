//! API Routes
//!
//! Configures the Axum router with all exploration endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    dimensions_handler, get_handler, health_handler, keys_handler, sample_handler,
    select_handler, snapshot_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin, so a browser UI can populate its controls
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get", post(get_handler))
        .route("/keys", get(keys_handler))
        .route("/select", post(select_handler))
        .route("/sample", post(sample_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/dimensions", get(dimensions_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
