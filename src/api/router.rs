use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let prefix = state.config.server.api_prefix.trim_end_matches('/').to_string();
    let body_limit = state.config.loader.max_upload_bytes;

    let router = Router::new()
        // Health endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check));

    let router = if prefix.is_empty() {
        router.merge(v1::create_v1_router())
    } else {
        router.nest(&prefix, v1::create_v1_router())
    };

    router
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Router with the Prometheus endpoint merged in when metrics are enabled
pub fn create_app_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let metrics_path = state.config.metrics.path.clone();
    let router = create_router_with_state(state);

    match metrics {
        Some(m) => router.merge(create_metrics_router(m, &metrics_path)),
        None => router,
    }
}
