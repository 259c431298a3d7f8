use axum::{
    routing::{get, post},
    Router,
};

use crate::api::{handlers, AppState};

/// Build the prediction router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict-category", post(handlers::predict_category))
        .with_state(state)
}
