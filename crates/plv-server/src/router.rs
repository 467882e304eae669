use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use plv_sdk::Dispatcher;

use crate::handler;

/// Build the axum router with all PLV endpoints.
pub fn build_router(dispatcher: Dispatcher) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/invoke", post(handler::invoke_handler))
        .route("/v1/query", post(handler::query_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(dispatcher)
}
