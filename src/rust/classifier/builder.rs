use std::collections::BTreeMap;

use log::{debug, info};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::naive_bayes::{MultinomialNb, DEFAULT_ALPHA};
use super::vectorizer::TfidfVectorizer;
use crate::dataset::TrainingSet;

/// Represents a class definition with a required label, an optional description and examples
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The category label predicted for texts of this class
    pub label: String,
    /// Optional human-readable description, carried into the artifact
    pub description: Option<String>,
    /// Example texts that belong to this class
    pub examples: Vec<String>,
}

impl ClassDefinition {
    /// Creates a new class definition with no examples
    ///
    /// # Example
    /// ```
    /// use categorizer::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("electronics")
    ///     .with_description("Phones, laptops and other devices")
    ///     .with_examples(vec!["laptop", "iphone"]);
    /// assert_eq!(class.examples.len(), 2);
    /// ```
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: None,
            examples: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds examples to the class definition
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples.extend(examples.into_iter().map(Into::into));
        self
    }
}

/// A builder for fitting a [`Classifier`] with a fluent interface.
///
/// Training examples are kept in insertion order; fitting happens only in
/// [`ClassifierBuilder::build`].
#[derive(Debug)]
pub struct ClassifierBuilder {
    texts: Vec<String>,
    categories: Vec<String>,
    class_descriptions: BTreeMap<String, String>,
    defined_classes: Vec<String>,
    alpha: f64,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates an empty builder with Laplace smoothing (`alpha = 1.0`)
    pub fn new() -> Self {
        Self {
            texts: Vec::new(),
            categories: Vec::new(),
            class_descriptions: BTreeMap::new(),
            defined_classes: Vec::new(),
            alpha: DEFAULT_ALPHA,
        }
    }

    /// Sets the additive smoothing parameter of the naive Bayes model.
    ///
    /// Validated at build time: it must be positive and finite.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Adds every example of a training set.
    ///
    /// # Returns
    /// * `Err(ClassifierError::DatasetMismatch)` if the set has a different
    ///   number of texts and category labels; nothing is added in that case
    /// * `Err(ClassifierError::ValidationError)` if the set is empty or
    ///   contains a blank text or label
    ///
    /// # Example
    /// ```
    /// use categorizer::{Classifier, TrainingSet};
    ///
    /// let result = Classifier::builder()
    ///     .with_training_set(TrainingSet::new(vec!["laptop", "wallet"], vec!["electronics"]));
    /// assert!(result.is_err());
    /// ```
    pub fn with_training_set(mut self, set: TrainingSet) -> Result<Self, ClassifierError> {
        set.validate()?;
        let (texts, categories) = set.into_parts();
        self.texts.extend(texts);
        self.categories.extend(categories);
        Ok(self)
    }

    /// Adds a class with its examples
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder instance if successful, or an error if:
    ///   - The class label is blank
    ///   - No examples are provided or any example is blank
    ///   - A class with the same label was already added this way
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        if class.label.trim().is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if class.examples.is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' must have at least one example",
                class.label
            )));
        }
        if let Some(pos) = class.examples.iter().position(|e| e.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Example {} cannot be empty",
                pos + 1
            )));
        }
        if self.defined_classes.contains(&class.label) {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' was already added",
                class.label
            )));
        }

        self.defined_classes.push(class.label.clone());
        if let Some(description) = class.description {
            self.class_descriptions.insert(class.label.clone(), description);
        }
        for example in class.examples {
            self.texts.push(example);
            self.categories.push(class.label.clone());
        }
        Ok(self)
    }

    /// Fits the vectorizer and the naive Bayes model and returns the classifier
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The fitted classifier, or an error if:
    ///   - No examples were added
    ///   - The training texts contain no tokens at all
    ///   - The smoothing parameter is invalid
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.texts.is_empty() {
            return Err(ClassifierError::BuildError(
                "At least one training example must be added".to_string(),
            ));
        }

        info!("Fitting vectorizer on {} examples", self.texts.len());
        let vectorizer = TfidfVectorizer::fit(&self.texts)?;
        info!("Vocabulary size: {}", vectorizer.len());

        let features = vectorizer.transform_all(&self.texts);
        let model = MultinomialNb::fit(&features, &self.categories, self.alpha)?;
        for (label, count) in model.classes().iter().zip(model.class_count()) {
            debug!("Class '{}': {} examples", label, count);
        }
        info!("Fitted naive Bayes model with {} classes", model.classes().len());

        Classifier::from_parts(vectorizer, model, self.class_descriptions)
            .map_err(|e| ClassifierError::BuildError(e.to_string()))
    }
}
