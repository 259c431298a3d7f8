//! A small product categorizer: TF-IDF features fed into a multinomial
//! naive Bayes classifier, persisted as a JSON artifact and served over HTTP.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use categorizer::{Classifier, ClassDefinition};
//!
//! let classifier = Classifier::builder()
//!     .add_class(
//!         ClassDefinition::new("electronics")
//!             .with_examples(vec!["laptop", "smartphone", "iphone"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("accessories")
//!             .with_examples(vec!["wallet", "handbag", "watch"])
//!     )?
//!     .build()?;
//!
//! let (label, scores) = classifier.predict("old iphone")?;
//! assert_eq!(label, "electronics");
//! assert!(scores["electronics"] > scores["accessories"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Persisting and serving
//!
//! The `train` binary runs [`trainer::train`], which fits the bundled
//! [`TrainingSet`] and writes it with an [`ArtifactStore`]; the `predict-server` binary loads that artifact once
//! and serves `POST /predict-category` through [`api::build_router`].
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use categorizer::{ArtifactStore, Classifier, TrainingSet};
//!
//! let classifier = Classifier::builder()
//!     .with_training_set(TrainingSet::builtin())?
//!     .build()?;
//! let store = ArtifactStore::default();
//! store.save(&classifier)?;
//! let reloaded = store.load()?;
//! assert_eq!(reloaded.predict_label("wallet")?, "accessories");
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod runtime;
pub mod trainer;

pub use artifact::{ArtifactError, ArtifactStore, ModelArtifact};
pub use classifier::{
    ClassDefinition, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo,
    MultinomialNb, TfidfVectorizer,
};
pub use dataset::TrainingSet;
pub use runtime::ServiceConfig;
pub use trainer::TrainerConfig;

/// Initializes `env_logger` with an `info` default, overridable through `RUST_LOG`.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
