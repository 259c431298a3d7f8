//! On-disk model artifact.
//!
//! The artifact is a single JSON document with two named sub-objects, one for
//! the vectorizer and one for the classifier, plus a format tag, a version and
//! a SHA-256 checksum of the parameters:
//!
//! ```json
//! {
//!   "format": "categorizer/tfidf-multinomial-nb",
//!   "version": 1,
//!   "checksum": "9f2c...",
//!   "vectorizer": { "vocabulary": { "adapter": 0, "bag": 1 }, "idf": [2.79, 2.79] },
//!   "classifier": {
//!     "alpha": 1.0,
//!     "classes": ["accessories", "electronics"],
//!     "class_count": [12.0, 11.0],
//!     "class_log_prior": [-0.65, -0.74],
//!     "feature_log_prob": [[-2.9, -2.9], [-3.4, -3.4]],
//!     "descriptions": {}
//!   }
//! }
//! ```
//!
//! The checksum is computed over a canonical byte encoding of the parameters
//! rather than the JSON text, so reformatting the file does not invalidate it
//! but changing any weight does.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::classifier::{Classifier, ClassifierError, MultinomialNb, TfidfVectorizer};

pub const ARTIFACT_FORMAT: &str = "categorizer/tfidf-multinomial-nb";
pub const ARTIFACT_VERSION: u32 = 1;
pub const DEFAULT_ARTIFACT_PATH: &str = "category_model.json";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Unsupported artifact format '{format}' version {version}")]
    UnsupportedFormat { format: String, version: u32 },
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("Corrupt artifact: {0}")]
    Corrupt(#[from] ClassifierError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorizerParams {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierParams {
    pub alpha: f64,
    pub classes: Vec<String>,
    pub class_count: Vec<f64>,
    pub class_log_prior: Vec<f64>,
    pub feature_log_prob: Vec<Vec<f64>>,
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
}

/// The serialized form of a [`Classifier`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    pub checksum: String,
    pub vectorizer: VectorizerParams,
    pub classifier: ClassifierParams,
}

impl ModelArtifact {
    pub fn from_classifier(classifier: &Classifier) -> Self {
        let vectorizer = classifier.vectorizer();
        let model = classifier.model();

        let vectorizer = VectorizerParams {
            vocabulary: vectorizer.vocabulary().clone(),
            idf: vectorizer.idf().to_vec(),
        };
        let classifier_params = ClassifierParams {
            alpha: model.alpha(),
            classes: model.classes().to_vec(),
            class_count: model.class_count().to_vec(),
            class_log_prior: model.class_log_prior().to_vec(),
            feature_log_prob: model
                .feature_log_prob()
                .rows()
                .into_iter()
                .map(|row| row.to_vec())
                .collect(),
            descriptions: classifier.class_descriptions().clone(),
        };
        let checksum = compute_checksum(&vectorizer, &classifier_params);

        Self {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            checksum,
            vectorizer,
            classifier: classifier_params,
        }
    }

    /// Checks the format tag, version and checksum without rebuilding the model.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        if self.format != ARTIFACT_FORMAT || self.version != ARTIFACT_VERSION {
            return Err(ArtifactError::UnsupportedFormat {
                format: self.format.clone(),
                version: self.version,
            });
        }
        let actual = compute_checksum(&self.vectorizer, &self.classifier);
        if actual != self.checksum {
            return Err(ArtifactError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Verifies the artifact and rebuilds the classifier, validating every shape.
    pub fn into_classifier(self) -> Result<Classifier, ArtifactError> {
        self.verify()?;
        let vectorizer =
            TfidfVectorizer::from_parts(self.vectorizer.vocabulary, self.vectorizer.idf)?;
        let params = self.classifier;
        let model = MultinomialNb::from_parts(
            params.alpha,
            params.classes,
            params.class_count,
            params.class_log_prior,
            params.feature_log_prob,
        )?;
        Ok(Classifier::from_parts(vectorizer, model, params.descriptions)?)
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_floats(hasher: &mut Sha256, values: &[f64]) {
    hasher.update((values.len() as u64).to_le_bytes());
    for v in values {
        hasher.update(v.to_le_bytes());
    }
}

fn compute_checksum(vectorizer: &VectorizerParams, classifier: &ClassifierParams) -> String {
    let mut hasher = Sha256::new();
    hash_str(&mut hasher, ARTIFACT_FORMAT);

    hasher.update((vectorizer.vocabulary.len() as u64).to_le_bytes());
    for (token, index) in &vectorizer.vocabulary {
        hash_str(&mut hasher, token);
        hasher.update((*index as u64).to_le_bytes());
    }
    hash_floats(&mut hasher, &vectorizer.idf);

    hasher.update(classifier.alpha.to_le_bytes());
    hasher.update((classifier.classes.len() as u64).to_le_bytes());
    for class in &classifier.classes {
        hash_str(&mut hasher, class);
    }
    hash_floats(&mut hasher, &classifier.class_count);
    hash_floats(&mut hasher, &classifier.class_log_prior);
    hasher.update((classifier.feature_log_prob.len() as u64).to_le_bytes());
    for row in &classifier.feature_log_prob {
        hash_floats(&mut hasher, row);
    }
    hasher.update((classifier.descriptions.len() as u64).to_le_bytes());
    for (label, description) in &classifier.descriptions {
        hash_str(&mut hasher, label);
        hash_str(&mut hasher, description);
    }

    format!("{:x}", hasher.finalize())
}

/// Reads and writes the model artifact at a fixed path.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl Default for ArtifactStore {
    fn default() -> Self {
        Self::new(DEFAULT_ARTIFACT_PATH)
    }
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Writes the classifier, replacing any previous artifact.
    ///
    /// The document is written to a temporary sibling and renamed into place,
    /// so a failure never leaves a partial artifact at the target path.
    pub fn save(&self, classifier: &Classifier) -> Result<(), ArtifactError> {
        let artifact = ModelArtifact::from_classifier(classifier);
        let bytes = serde_json::to_vec_pretty(&artifact)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                log::debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent)?;
            }
        }

        let tmp_path = self.tmp_path();
        log::debug!("Writing {} bytes to {:?}", bytes.len(), tmp_path);
        if let Err(e) = fs::write(&tmp_path, &bytes) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        log::info!(
            "Saved artifact to {:?} (checksum {})",
            self.path,
            artifact.checksum
        );
        Ok(())
    }

    /// Reads the raw artifact document without verifying it.
    pub fn read(&self) -> Result<ModelArtifact, ArtifactError> {
        let bytes = fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ArtifactError::NotFound(self.path.clone()),
            _ => ArtifactError::Io(e),
        })?;
        log::debug!("Read {} bytes from {:?}", bytes.len(), self.path);
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Loads, verifies and rebuilds the classifier.
    pub fn load(&self) -> Result<Classifier, ArtifactError> {
        log::info!("Loading artifact from {:?}", self.path);
        let classifier = self.read()?.into_classifier()?;
        log::info!(
            "Artifact loaded: {} classes, {} features",
            classifier.model().classes().len(),
            classifier.vectorizer().len()
        );
        Ok(classifier)
    }

    /// Returns whether an artifact exists and passes verification.
    pub fn verify(&self) -> Result<bool, ArtifactError> {
        if !self.exists() {
            log::info!("Artifact {:?} does not exist", self.path);
            return Ok(false);
        }
        match self.read().and_then(|a| a.verify()) {
            Ok(()) => Ok(true),
            Err(ArtifactError::Io(e)) => Err(ArtifactError::Io(e)),
            Err(e) => {
                log::warn!("Artifact verification failed: {}", e);
                Ok(false)
            }
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDefinition, TrainingSet};
    use tempfile::TempDir;

    fn trained() -> Classifier {
        Classifier::builder()
            .with_training_set(TrainingSet::builtin())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_checksum_is_stable() {
        let classifier = trained();
        let a = ModelArtifact::from_classifier(&classifier);
        let b = ModelArtifact::from_classifier(&classifier);
        assert_eq!(a.checksum, b.checksum);
        assert_eq!(a.checksum.len(), 64);
        assert!(a.verify().is_ok());
    }

    #[test]
    fn test_tampered_weight_is_detected() {
        let mut artifact = ModelArtifact::from_classifier(&trained());
        artifact.classifier.feature_log_prob[0][0] += 0.5;
        assert!(matches!(
            artifact.verify(),
            Err(ArtifactError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_format_rejected() {
        let mut artifact = ModelArtifact::from_classifier(&trained());
        artifact.version = 99;
        assert!(matches!(
            artifact.into_classifier(),
            Err(ArtifactError::UnsupportedFormat { version: 99, .. })
        ));
    }

    #[test]
    fn test_shape_errors_are_corrupt() {
        let mut artifact = ModelArtifact::from_classifier(&trained());
        artifact.vectorizer.idf.pop();
        artifact.checksum = compute_checksum(&artifact.vectorizer, &artifact.classifier);
        assert!(matches!(
            artifact.into_classifier(),
            Err(ArtifactError::Corrupt(_))
        ));
    }

    #[test]
    fn test_descriptions_round_trip() {
        let classifier = Classifier::builder()
            .add_class(
                ClassDefinition::new("bags")
                    .with_description("Things you carry")
                    .with_examples(vec!["bag", "purse"]),
            )
            .unwrap()
            .add_class(ClassDefinition::new("phones").with_examples(vec!["iphone"]))
            .unwrap()
            .build()
            .unwrap();

        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        store.save(&classifier).unwrap();
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.class_descriptions(), classifier.class_descriptions());

        let mut artifact = store.read().unwrap();
        artifact
            .classifier
            .descriptions
            .insert("bags".into(), "Something else".into());
        assert!(matches!(
            artifact.verify(),
            Err(ArtifactError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_tmp_path_is_sibling() {
        let store = ArtifactStore::new("models/category_model.json");
        assert_eq!(store.tmp_path(), PathBuf::from("models/category_model.json.tmp"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("model.json"));
        fs::write(store.path(), b"stale").unwrap();
        assert!(!store.verify().unwrap());

        store.save(&trained()).unwrap();
        assert!(store.verify().unwrap());
        assert!(!store.tmp_path().exists());
    }
}
