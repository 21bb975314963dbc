use std::fmt;

use log::{debug, trace};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::tree::decision_tree_classifier::SplitCriterion;

use crate::config::{Criterion, ModelConfig};
use crate::error::ModelError;
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::Label;

/// The fitted smartcore forest this crate binds to.
pub type SmartForest = RandomForestClassifier<f64, Label, DenseMatrix<f64>, Vec<Label>>;

/// Random forest classifier backed by smartcore.
pub struct ForestModel {
    config: ModelConfig,
    forest: Option<SmartForest>,
    n_features: Option<usize>,
}

impl ForestModel {
    pub fn new(config: ModelConfig) -> Self {
        ForestModel {
            config,
            forest: None,
            n_features: None,
        }
    }

    /// Reassemble a model from persisted parts.
    pub(crate) fn from_parts(config: ModelConfig, forest: SmartForest, n_features: usize) -> Self {
        ForestModel {
            config,
            forest: Some(forest),
            n_features: Some(n_features),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub(crate) fn forest(&self) -> Option<&SmartForest> {
        self.forest.as_ref()
    }

    fn backend_params(&self) -> RandomForestClassifierParameters {
        let criterion = match self.config.criterion {
            Criterion::Gini => SplitCriterion::Gini,
            Criterion::Entropy | Criterion::LogLoss => SplitCriterion::Entropy,
            Criterion::ClassificationError => SplitCriterion::ClassificationError,
        };

        let mut params = RandomForestClassifierParameters::default()
            .with_n_trees(self.config.n_estimators)
            .with_criterion(criterion)
            .with_min_samples_leaf(self.config.min_samples_leaf)
            .with_min_samples_split(self.config.min_samples_split)
            .with_keep_samples(self.config.keep_samples())
            .with_seed(self.config.random_state);
        if let Some(max_depth) = self.config.max_depth {
            params = params.with_max_depth(max_depth);
        }
        if let Some(m) = self.config.max_features {
            params = params.with_m(m);
        }
        params
    }
}

impl ClassifierModel for ForestModel {
    /// Labels must name at least two classes; smartcore rejects a
    /// single-class target and that surfaces as [`ModelError::Backend`].
    fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<(), ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                rows: x.nrows(),
                labels: y.len(),
            });
        }
        check_features(x)?;
        if let Some(m) = self.config.max_features {
            if m > x.ncols() {
                return Err(ModelError::InvalidHyperparameter {
                    key: "max_features".to_string(),
                    reason: format!("{} exceeds the {} available features", m, x.ncols()),
                });
            }
        }

        debug!(
            "fitting random forest: rows={}, cols={}, n_estimators={}",
            x.nrows(),
            x.ncols(),
            self.config.n_estimators
        );
        let forest = RandomForestClassifier::fit(&to_dense(x), &y.to_vec(), self.backend_params())?;

        self.forest = Some(forest);
        self.n_features = Some(x.ncols());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>, ModelError> {
        let forest = self.forest.as_ref().ok_or(ModelError::NotFitted)?;
        let expected = self.n_features.ok_or(ModelError::NotFitted)?;
        if x.ncols() != expected {
            return Err(ModelError::FeatureCountMismatch {
                expected,
                got: x.ncols(),
            });
        }
        if x.nrows() == 0 {
            return Ok(Vec::new());
        }
        check_features(x)?;

        let predictions = forest.predict(&to_dense(x))?;
        trace!(
            "predicted {} rows, first {:?}",
            predictions.len(),
            &predictions[..predictions.len().min(10)]
        );
        Ok(predictions)
    }

    fn is_fitted(&self) -> bool {
        self.forest.is_some()
    }

    fn n_features(&self) -> Option<usize> {
        self.n_features
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}

impl fmt::Debug for ForestModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForestModel")
            .field("config", &self.config)
            .field("fitted", &self.forest.is_some())
            .field("n_features", &self.n_features)
            .finish()
    }
}

/// Reject empty matrices and NaN/inf before they reach the backend.
fn check_features(x: &Array2<f64>) -> Result<(), ModelError> {
    if x.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    for (row, values) in x.rows().enumerate() {
        if let Some(col) = values.iter().position(|v| !v.is_finite()) {
            return Err(ModelError::NonFiniteValue { row, col });
        }
    }
    Ok(())
}

fn to_dense(x: &Array2<f64>) -> DenseMatrix<f64> {
    DenseMatrix::new(x.nrows(), x.ncols(), x.as_slice().to_vec(), false)
}
