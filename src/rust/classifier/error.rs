use thiserror::Error;

/// Represents the different types of errors that can occur in the text classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The training texts and their category labels do not line up
    #[error("Dataset mismatch: {texts} texts but {categories} category labels")]
    DatasetMismatch { texts: usize, categories: usize },
    /// Error occurred while fitting or applying the TF-IDF vectorizer
    #[error("Vectorizer error: {0}")]
    VectorizerError(String),
    /// Error occurred while fitting or evaluating the naive Bayes model
    #[error("Model error: {0}")]
    ModelError(String),
    /// Error occurred during the build phase
    #[error("Build error: {0}")]
    BuildError(String),
    /// Error occurred while making predictions
    #[error("Prediction error: {0}")]
    PredictionError(String),
    /// Error occurred due to invalid input parameters
    #[error("Validation error: {0}")]
    ValidationError(String),
}
