//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shorten`      - Allocate (or reuse) a short key for a URL
//! - `GET  /health`       - Health check: mapping store and cache
//! - `GET  /{short_key}`  - Short link redirect
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` assigned when absent and echoed on the response
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routes with their middleware, without path normalization.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/health", get(health_handler))
        .route("/{short_key}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::propagate_request_id_layer())
        .layer(tracing::layer())
        .layer(tracing::set_request_id_layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
