use axum::Router;
use axum::routing::get;

use crate::AppState;
use crate::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::today))
        .route("/today", get(handlers::today))
        .route("/yesterday", get(handlers::yesterday))
        .route("/all", get(handlers::all_time))
        .route("/api/counts/:view", get(handlers::counts))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
