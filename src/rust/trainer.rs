use std::path::PathBuf;
use std::time::Instant;

use log::info;
use thiserror::Error;

use crate::artifact::{ArtifactError, ArtifactStore, DEFAULT_ARTIFACT_PATH};
use crate::classifier::naive_bayes::DEFAULT_ALPHA;
use crate::classifier::{Classifier, ClassifierError};
use crate::dataset::TrainingSet;

/// Settings for a training run.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub output: PathBuf,
    pub alpha: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            alpha: DEFAULT_ALPHA,
        }
    }
}

#[derive(Debug, Error)]
pub enum TrainError {
    #[error("Training failed: {0}")]
    Classifier(#[from] ClassifierError),

    #[error("Failed to write model: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Fits the bundled training set and writes the artifact to `config.output`.
pub fn train(config: &TrainerConfig) -> Result<Classifier, TrainError> {
    train_on(TrainingSet::builtin(), config)
}

/// Fits `set` and writes the artifact to `config.output`.
///
/// The set is validated before fitting; an invalid set leaves the output
/// path untouched.
pub fn train_on(set: TrainingSet, config: &TrainerConfig) -> Result<Classifier, TrainError> {
    let start_time = Instant::now();
    info!(
        "Training on {} examples across {} categories",
        set.len(),
        set.labels().len()
    );

    let classifier = Classifier::builder()
        .with_alpha(config.alpha)
        .with_training_set(set)?
        .build()?;

    let info = classifier.info();
    info!(
        "Vocabulary: {} tokens, classes: {:?}",
        info.vocabulary_size, info.class_labels
    );

    ArtifactStore::new(&config.output).save(&classifier)?;
    info!("Training took {:.2?}", start_time.elapsed());
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> TrainerConfig {
        TrainerConfig {
            output: dir.path().join("model.json"),
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.output, PathBuf::from("category_model.json"));
        assert_eq!(config.alpha, 1.0);
    }

    #[test]
    fn test_train_writes_loadable_artifact() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let classifier = train(&config).unwrap();
        assert!(config.output.exists());

        let reloaded = ArtifactStore::new(&config.output).load().unwrap();
        for text in ["iphone", "wallet", "laptop bag", "rolex smartwatch", "zzz"] {
            assert_eq!(
                classifier.predict_label(text).unwrap(),
                reloaded.predict_label(text).unwrap()
            );
        }
        assert_eq!(reloaded.predict_label("iphone").unwrap(), "electronics");
        assert_eq!(reloaded.predict_label("wallet").unwrap(), "accessories");
    }

    #[test]
    fn test_mismatched_set_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let set = TrainingSet::new(vec!["laptop", "wallet"], vec!["electronics"]);
        let err = train_on(set, &config).unwrap_err();
        assert!(matches!(
            err,
            TrainError::Classifier(ClassifierError::DatasetMismatch { texts: 2, categories: 1 })
        ));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_alpha_is_stored() {
        let dir = TempDir::new().unwrap();
        let config = TrainerConfig {
            alpha: 0.5,
            ..config_in(&dir)
        };
        train(&config).unwrap();
        let reloaded = ArtifactStore::new(&config.output).load().unwrap();
        assert_eq!(reloaded.info().alpha, 0.5);
    }

    #[test]
    fn test_invalid_alpha_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let config = TrainerConfig {
            alpha: 0.0,
            ..config_in(&dir)
        };
        assert!(matches!(train(&config), Err(TrainError::Classifier(_))));
        assert!(!config.output.exists());
    }
}
