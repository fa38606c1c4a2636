//! HTTP API route definitions.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{echo, health, info, not_found, render_metrics, root, secret, AppState};
use crate::error::ApiError;
use crate::metrics::track_metrics;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Greeting and info endpoints
        .route("/", get(root))
        .route("/api/info", get(info))
        .route("/api/echo", post(echo))
        // Metrics endpoint
        .route("/metrics", get(render_metrics));

    if state.config.secret_endpoint {
        router = router.route("/secret", get(secret));
    }

    with_layers(router.fallback(not_found).with_state(state))
}

/// Apply panic recovery, request tracing and metrics to a router.
///
/// Metrics sit outermost so recovered panics are counted as 500s.
pub fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(track_metrics))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}
