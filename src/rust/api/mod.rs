pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use routes::build_router;

use crate::classifier::Classifier;
use std::sync::Arc;

/// Shared application state, built once after the model is loaded
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(classifier: Arc<Classifier>) -> Self {
        Self { classifier }
    }
}
