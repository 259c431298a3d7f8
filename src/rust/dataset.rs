//! Training data: parallel lists of product names and their categories.

use std::collections::BTreeSet;

use crate::classifier::ClassifierError;

/// Product names the bundled model is trained on, grouped by category.
const ELECTRONICS: [&str; 11] = [
    "laptop",
    "notebook",
    "macbook",
    "dell laptop",
    "hp laptop",
    "lenovo laptop",
    "mobile",
    "smartphone",
    "iphone",
    "samsung phone",
    "oneplus",
];

const ACCESSORIES: [&str; 12] = [
    "bag",
    "wallet",
    "purse",
    "handbag",
    "watch",
    "rolex watch",
    "smartwatch",
    "charger",
    "cable",
    "adapter",
    "headphones",
    "earphones",
];

/// A set of training texts and the category label of each.
///
/// The two lists are stored as given so that a length mismatch can be
/// reported by [`TrainingSet::validate`] instead of silently truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingSet {
    texts: Vec<String>,
    categories: Vec<String>,
}

impl TrainingSet {
    pub fn new(texts: Vec<impl Into<String>>, categories: Vec<impl Into<String>>) -> Self {
        Self {
            texts: texts.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// The 23 bundled product examples: 11 electronics, 12 accessories.
    pub fn builtin() -> Self {
        let texts: Vec<&str> = ELECTRONICS.iter().chain(ACCESSORIES.iter()).copied().collect();
        let categories: Vec<&str> = std::iter::repeat("electronics")
            .take(ELECTRONICS.len())
            .chain(std::iter::repeat("accessories").take(ACCESSORIES.len()))
            .collect();
        Self::new(texts, categories)
    }

    /// Checks that every text has exactly one non-blank label.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.texts.len() != self.categories.len() {
            return Err(ClassifierError::DatasetMismatch {
                texts: self.texts.len(),
                categories: self.categories.len(),
            });
        }
        if self.texts.is_empty() {
            return Err(ClassifierError::ValidationError("Training set is empty".into()));
        }
        if let Some(pos) = self.texts.iter().position(|t| t.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Training text {} is blank",
                pos + 1
            )));
        }
        if let Some(pos) = self.categories.iter().position(|c| c.trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Category label {} is blank",
                pos + 1
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// `(text, category)` pairs. Stops at the shorter list.
    pub fn examples(&self) -> impl Iterator<Item = (&str, &str)> {
        self.texts
            .iter()
            .zip(&self.categories)
            .map(|(t, c)| (t.as_str(), c.as_str()))
    }

    /// Distinct category labels in sorted order.
    pub fn labels(&self) -> Vec<String> {
        self.categories
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.texts, self.categories)
    }
}
