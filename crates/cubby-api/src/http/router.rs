//! Axum router configuration with middleware.
//!
//! Middleware: CORS (the companion app is a local web view) and
//! request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/setup", post(handlers::setup::setup))
        .route("/v1/chat", post(handlers::chat::chat))
        .route("/health", get(health_check))
        .route("/", get(service_info))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET / - static service info.
async fn service_info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "service": "cubby",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": ["/v1/setup", "/v1/chat", "/health"],
    }))
}
