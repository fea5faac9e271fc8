use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{analyzer, query_builder, AppState};
use crate::config::Config;

/// Create the application router with shared state
pub fn create_router_with_state(config: Config) -> Router {
    let state = AppState { config };

    Router::new()
        .route("/health", get(health_check))
        .route("/api/analyzer/csv", post(analyzer::analyze_csv))
        .route(
            "/api/query-builder/generate",
            post(query_builder::generate_sql),
        )
        .route(
            "/api/query-builder/validate",
            post(query_builder::validate_sql),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
