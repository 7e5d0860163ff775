pub mod health;
pub mod stats;

use crate::orchestration::PipelineStats;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub stats: Arc<PipelineStats>,
}

impl AppState {
    pub fn new(stats: Arc<PipelineStats>) -> Self {
        Self { stats }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/stats", get(stats::get_stats))
        .layer(cors)
        .with_state(state)
}
