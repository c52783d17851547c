pub mod health;
pub mod preview;

use crate::config::Config;
use crate::orchestration::RoyaltyCalculator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub calculator: Arc<RoyaltyCalculator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let calculator = Arc::new(RoyaltyCalculator::new(config.calculation_options()));
        Self { config, calculator }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/royalties/preview", post(preview::preview_calculation))
        .route("/v1/royalties/preview/batch", post(preview::preview_batch))
        .layer(cors)
        .with_state(state)
}
