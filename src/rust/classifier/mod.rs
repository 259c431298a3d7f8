mod builder;
mod classifier;
mod error;
pub mod naive_bayes;
pub mod tokenizer;
mod utils;
pub mod vectorizer;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use builder::{ClassDefinition, ClassifierBuilder};
pub use classifier::Classifier;
pub use error::ClassifierError;
pub use naive_bayes::MultinomialNb;
pub use vectorizer::TfidfVectorizer;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in sorted order
    pub class_labels: Vec<String>,
    /// Descriptions of the classes that were given one
    pub class_descriptions: Arc<BTreeMap<String, String>>,
    /// Number of TF-IDF feature columns
    pub vocabulary_size: usize,
    /// Additive smoothing used when fitting
    pub alpha: f64,
}
