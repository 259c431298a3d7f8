use std::collections::{BTreeMap, BTreeSet};

use ndarray::Array1;

use super::error::ClassifierError;
use super::tokenizer::tokenize;
use super::utils::normalize_vector;

/// TF-IDF vectorizer with a vocabulary learned from the training corpus.
///
/// Vocabulary columns follow the sorted order of the tokens, so two fits over
/// the same corpus always produce the same feature space. Document vectors are
/// raw term counts weighted by smoothed IDF and scaled to unit L2 norm.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and IDF weights from `documents`.
    ///
    /// IDF uses add-one smoothing on both the document count and the document
    /// frequency: `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, ClassifierError> {
        if documents.is_empty() {
            return Err(ClassifierError::VectorizerError(
                "Cannot fit vectorizer on an empty corpus".into(),
            ));
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for token in unique {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ClassifierError::VectorizerError(
                "Empty vocabulary; training texts contain no tokens".into(),
            ));
        }

        let n = documents.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Array1::zeros(document_frequency.len());
        for (index, (token, df)) in document_frequency.into_iter().enumerate() {
            idf[index] = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
            vocabulary.insert(token, index);
        }

        Ok(Self { vocabulary, idf })
    }

    /// Rebuilds a fitted vectorizer from stored parameters.
    ///
    /// Fails unless the vocabulary indices are exactly `0..idf.len()` and
    /// every weight is finite and positive.
    pub fn from_parts(
        vocabulary: BTreeMap<String, usize>,
        idf: Vec<f64>,
    ) -> Result<Self, ClassifierError> {
        if vocabulary.is_empty() {
            return Err(ClassifierError::VectorizerError("Vocabulary is empty".into()));
        }
        if vocabulary.len() != idf.len() {
            return Err(ClassifierError::VectorizerError(format!(
                "Vocabulary has {} entries but {} IDF weights",
                vocabulary.len(),
                idf.len()
            )));
        }
        let mut seen = vec![false; idf.len()];
        for (token, &index) in &vocabulary {
            if index >= seen.len() || seen[index] {
                return Err(ClassifierError::VectorizerError(format!(
                    "Invalid or duplicate column {} for token '{}'",
                    index, token
                )));
            }
            seen[index] = true;
        }
        if let Some(pos) = idf.iter().position(|w| !w.is_finite() || *w <= 0.0) {
            return Err(ClassifierError::VectorizerError(format!(
                "IDF weight at column {} is not a positive finite number",
                pos
            )));
        }
        Ok(Self {
            vocabulary,
            idf: Array1::from(idf),
        })
    }

    /// Maps a document into the learned feature space.
    ///
    /// Tokens outside the vocabulary are ignored; a document with no known
    /// tokens becomes the zero vector.
    pub fn transform(&self, document: &str) -> Array1<f64> {
        let mut counts = Array1::<f64>::zeros(self.idf.len());
        for token in tokenize(document) {
            if let Some(&index) = self.vocabulary.get(&token) {
                counts[index] += 1.0;
            }
        }
        normalize_vector(&(counts * &self.idf))
    }

    /// Transforms every document in order.
    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Array1<f64>> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    /// Token to column index, in column order.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    /// Number of feature columns.
    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }
}
