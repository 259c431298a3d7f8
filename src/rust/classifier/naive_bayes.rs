use std::collections::BTreeMap;

use ndarray::{Array1, Array2};

use super::error::ClassifierError;
use super::utils::log_sum_exp;

/// Default additive smoothing strength.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Multinomial naive Bayes over non-negative feature vectors.
///
/// Classes are kept in sorted label order. Rows of `feature_log_prob` line
/// up with `classes`; columns line up with the vectorizer's vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct MultinomialNb {
    alpha: f64,
    classes: Vec<String>,
    class_count: Array1<f64>,
    class_log_prior: Array1<f64>,
    feature_log_prob: Array2<f64>,
}

fn check_alpha(alpha: f64) -> Result<(), ClassifierError> {
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(ClassifierError::ValidationError(format!(
            "Smoothing alpha must be a positive finite number, got {}",
            alpha
        )));
    }
    Ok(())
}

impl MultinomialNb {
    /// Fits class priors and per-class feature log probabilities.
    ///
    /// Priors come from class frequencies. Feature probabilities use
    /// Laplace smoothing: `(F[c][j] + alpha) / (sum_j F[c][j] + alpha * d)`.
    pub fn fit<S: AsRef<str>>(
        rows: &[Array1<f64>],
        labels: &[S],
        alpha: f64,
    ) -> Result<Self, ClassifierError> {
        check_alpha(alpha)?;
        if rows.len() != labels.len() {
            return Err(ClassifierError::DatasetMismatch {
                texts: rows.len(),
                categories: labels.len(),
            });
        }
        if rows.is_empty() {
            return Err(ClassifierError::ModelError("Cannot fit on zero samples".into()));
        }

        let n_features = rows[0].len();
        if n_features == 0 {
            return Err(ClassifierError::ModelError("Feature vectors are empty".into()));
        }

        let mut per_class: BTreeMap<&str, (f64, Array1<f64>)> = BTreeMap::new();
        for (i, (row, label)) in rows.iter().zip(labels).enumerate() {
            if row.len() != n_features {
                return Err(ClassifierError::ModelError(format!(
                    "Row {} has {} features, expected {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            if row.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ClassifierError::ModelError(format!(
                    "Row {} contains negative or non-finite features",
                    i
                )));
            }
            let entry = per_class
                .entry(label.as_ref())
                .or_insert_with(|| (0.0, Array1::zeros(n_features)));
            entry.0 += 1.0;
            entry.1 += row;
        }

        let n_classes = per_class.len();
        let n_samples = rows.len() as f64;
        let mut classes = Vec::with_capacity(n_classes);
        let mut class_count = Array1::zeros(n_classes);
        let mut feature_log_prob = Array2::zeros((n_classes, n_features));

        for (c, (label, (count, feature_count))) in per_class.into_iter().enumerate() {
            classes.push(label.to_string());
            class_count[c] = count;
            let smoothed = feature_count.mapv(|f| f + alpha);
            let denominator = smoothed.sum();
            feature_log_prob
                .row_mut(c)
                .assign(&smoothed.mapv(|f| (f / denominator).ln()));
        }
        let class_log_prior = class_count.mapv(|c: f64| (c / n_samples).ln());

        Ok(Self {
            alpha,
            classes,
            class_count,
            class_log_prior,
            feature_log_prob,
        })
    }

    /// Rebuilds a fitted model from stored parameters, checking that the
    /// shapes agree and the classes are distinct and sorted.
    pub fn from_parts(
        alpha: f64,
        classes: Vec<String>,
        class_count: Vec<f64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self, ClassifierError> {
        check_alpha(alpha)?;
        let n_classes = classes.len();
        if n_classes == 0 {
            return Err(ClassifierError::ModelError("Model has no classes".into()));
        }
        if !classes.windows(2).all(|w| w[0] < w[1]) {
            return Err(ClassifierError::ModelError(
                "Classes must be distinct and sorted".into(),
            ));
        }
        if class_count.len() != n_classes
            || class_log_prior.len() != n_classes
            || feature_log_prob.len() != n_classes
        {
            return Err(ClassifierError::ModelError(format!(
                "Expected {} entries for classes, counts, priors and feature rows",
                n_classes
            )));
        }
        let n_features = feature_log_prob[0].len();
        if n_features == 0 || feature_log_prob.iter().any(|r| r.len() != n_features) {
            return Err(ClassifierError::ModelError(
                "Feature log probability rows have inconsistent lengths".into(),
            ));
        }
        if class_log_prior
            .iter()
            .chain(feature_log_prob.iter().flatten())
            .any(|v| !v.is_finite())
        {
            return Err(ClassifierError::ModelError(
                "Model parameters contain non-finite values".into(),
            ));
        }

        let flat: Vec<f64> = feature_log_prob.into_iter().flatten().collect();
        let feature_log_prob = Array2::from_shape_vec((n_classes, n_features), flat)
            .map_err(|e| ClassifierError::ModelError(e.to_string()))?;

        Ok(Self {
            alpha,
            classes,
            class_count: Array1::from(class_count),
            class_log_prior: Array1::from(class_log_prior),
            feature_log_prob,
        })
    }

    /// Unnormalized log posterior for every class.
    pub fn joint_log_likelihood(&self, x: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
        if x.len() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Expected {} features, got {}",
                self.n_features(),
                x.len()
            )));
        }
        Ok(self.feature_log_prob.dot(x) + &self.class_log_prior)
    }

    /// Index of the most likely class. Ties go to the earlier class.
    pub fn predict_index(&self, x: &Array1<f64>) -> Result<usize, ClassifierError> {
        let jll = self.joint_log_likelihood(x)?;
        let mut best = 0;
        for (i, &score) in jll.iter().enumerate() {
            if score > jll[best] {
                best = i;
            }
        }
        Ok(best)
    }

    pub fn predict(&self, x: &Array1<f64>) -> Result<&str, ClassifierError> {
        let index = self.predict_index(x)?;
        Ok(&self.classes[index])
    }

    /// Posterior probabilities, aligned with [`MultinomialNb::classes`].
    pub fn predict_proba(&self, x: &Array1<f64>) -> Result<Array1<f64>, ClassifierError> {
        let jll = self.joint_log_likelihood(x)?;
        let norm = log_sum_exp(&jll);
        Ok(jll.mapv(|v| (v - norm).exp()))
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn class_count(&self) -> &Array1<f64> {
        &self.class_count
    }

    pub fn class_log_prior(&self) -> &Array1<f64> {
        &self.class_log_prior
    }

    pub fn feature_log_prob(&self) -> &Array2<f64> {
        &self.feature_log_prob
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }
}
