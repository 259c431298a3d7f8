use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use super::error::ClassifierError;
use super::naive_bayes::MultinomialNb;
use super::vectorizer::TfidfVectorizer;

/// A thread-safe text classifier: a TF-IDF vectorizer paired with the
/// multinomial naive Bayes model that was fitted on its feature space.
///
/// # Thread Safety
///
/// Both halves are immutable after fitting and held behind `Arc`, so a
/// classifier can be cloned cheaply or shared across threads and request
/// handlers without locking.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use categorizer::{Classifier, TrainingSet};
/// use std::sync::Arc;
/// use std::thread;
///
/// let classifier = Arc::new(
///     Classifier::builder()
///         .with_training_set(TrainingSet::builtin())?
///         .build()?,
/// );
///
/// let classifier_clone = Arc::clone(&classifier);
/// let label = thread::spawn(move || classifier_clone.predict_label("iphone"))
///     .join()
///     .unwrap()?;
/// assert_eq!(label, "electronics");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    vectorizer: Arc<TfidfVectorizer>,
    model: Arc<MultinomialNb>,
    class_descriptions: Arc<BTreeMap<String, String>>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Pairs an already fitted vectorizer and model.
    ///
    /// Fails if the model was not fitted on the vectorizer's feature space.
    pub fn from_parts(
        vectorizer: TfidfVectorizer,
        model: MultinomialNb,
        class_descriptions: BTreeMap<String, String>,
    ) -> Result<Self, ClassifierError> {
        if vectorizer.len() != model.n_features() {
            return Err(ClassifierError::ModelError(format!(
                "Vectorizer produces {} features but the model expects {}",
                vectorizer.len(),
                model.n_features()
            )));
        }
        Ok(Self {
            vectorizer: Arc::new(vectorizer),
            model: Arc::new(model),
            class_descriptions: Arc::new(class_descriptions),
        })
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.model.classes().len(),
            class_labels: self.model.classes().to_vec(),
            class_descriptions: Arc::clone(&self.class_descriptions),
            vocabulary_size: self.vectorizer.len(),
            alpha: self.model.alpha(),
        }
    }

    /// Predicts the category of the input text and returns per-class probabilities.
    ///
    /// # Returns
    /// A tuple containing:
    /// * The predicted class label
    /// * A map of every class label to its posterior probability (sums to 1.0)
    ///
    /// # Errors
    /// `ValidationError` if the text is empty or whitespace only.
    ///
    /// # Example
    /// ```rust
    /// # use categorizer::{Classifier, TrainingSet};
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let classifier = Classifier::builder()
    /// #     .with_training_set(TrainingSet::builtin())?
    /// #     .build()?;
    /// let (label, scores) = classifier.predict("wallet")?;
    /// assert_eq!(label, "accessories");
    /// assert!(scores["accessories"] > scores["electronics"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn predict(&self, text: &str) -> Result<(String, HashMap<String, f64>), ClassifierError> {
        let features = self.featurize(text)?;
        let index = self.model.predict_index(&features)?;
        let probabilities = self.model.predict_proba(&features)?;

        let scores = self
            .model
            .classes()
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect();

        Ok((self.model.classes()[index].clone(), scores))
    }

    /// Predicts only the top category label.
    pub fn predict_label(&self, text: &str) -> Result<String, ClassifierError> {
        let features = self.featurize(text)?;
        Ok(self.model.predict(&features)?.to_string())
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn model(&self) -> &MultinomialNb {
        &self.model
    }

    pub fn class_descriptions(&self) -> &BTreeMap<String, String> {
        &self.class_descriptions
    }

    fn featurize(&self, text: &str) -> Result<ndarray::Array1<f64>, ClassifierError> {
        if text.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Input text cannot be empty".into()));
        }
        Ok(self.vectorizer.transform(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrainingSet;

    fn builtin_classifier() -> Classifier {
        Classifier::builder()
            .with_training_set(TrainingSet::builtin())
            .unwrap()
            .build()
            .expect("Failed to create classifier")
    }

    #[test]
    fn test_class_info() {
        let info = builtin_classifier().info();
        assert_eq!(info.num_classes, 2);
        assert_eq!(info.class_labels, vec!["accessories", "electronics"]);
        assert_eq!(info.vocabulary_size, 24);
        assert_eq!(info.alpha, 1.0);
    }

    #[test]
    fn test_blank_text_is_rejected() {
        let classifier = builtin_classifier();
        for text in ["", " ", "\t\n"] {
            assert!(matches!(
                classifier.predict(text),
                Err(ClassifierError::ValidationError(_))
            ));
            assert!(classifier.predict_label(text).is_err());
        }
    }

    #[test]
    fn test_scores_are_probabilities() {
        let (label, scores) = builtin_classifier().predict("samsung phone").unwrap();
        assert_eq!(label, "electronics");
        assert_eq!(scores.len(), 2);
        let total: f64 = scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_predict_agrees_with_predict_label() {
        let classifier = builtin_classifier();
        for text in ["laptop bag", "watch phone", "rolex", "cable"] {
            let (label, _) = classifier.predict(text).unwrap();
            assert_eq!(label, classifier.predict_label(text).unwrap());
        }
    }

    #[test]
    fn test_from_parts_rejects_mismatched_halves() {
        let classifier = builtin_classifier();
        let other = TfidfVectorizer::fit(&["only one token"]).unwrap();
        let result = Classifier::from_parts(other, classifier.model().clone(), BTreeMap::new());
        assert!(matches!(result, Err(ClassifierError::ModelError(_))));
    }

    #[test]
    fn test_clone_shares_model() {
        let classifier = builtin_classifier();
        let clone = classifier.clone();
        assert!(Arc::ptr_eq(&classifier.model, &clone.model));
    }
}
