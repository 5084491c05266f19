//! Axum router configuration with middleware.
//!
//! Routes:
//! - `/history` and its alias `/api/room/history` (GET, POST)
//! - `/api/message` (POST)
//! - `/health` (GET)
//!
//! Middleware: CORS (any origin), request tracing.

use axum::Router;
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let history = get(handlers::history::get_history)
        .post(handlers::history::append_history)
        .options(preflight);

    Router::new()
        .route("/history", history.clone())
        .route("/api/room/history", history)
        .route(
            "/api/message",
            post(handlers::message::submit_message).options(preflight),
        )
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Empty 200 for any `OPTIONS` request the CORS layer lets through.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
