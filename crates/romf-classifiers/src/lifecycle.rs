//! Stateful handle over a random forest: configure, fit, predict, evaluate,
//! save and load.
//!
//! The handle moves through `Unconfigured -> Configured/Loaded -> Fitted ->
//! Predicted`. Calling an operation out of order returns a [`ModelError`]
//! rather than panicking.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::math::Array2;
use crate::metrics;
use crate::models::factory::build_model;
use crate::models::{ClassifierModel, ForestModel};
use crate::persist;
use crate::Label;

/// Options for [`RandomForest::params`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParamsOptions {
    /// Also report the per-tree estimator parameters.
    pub deep: bool,
}

/// Random forest model bound to a file location.
#[derive(Debug)]
pub struct RandomForest {
    model_path: PathBuf,
    model: Option<ForestModel>,
    predictions: Option<Vec<Label>>,
}

impl RandomForest {
    /// Create an unconfigured handle that saves to and loads from `model_path`.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        RandomForest {
            model_path: model_path.into(),
            model: None,
            predictions: None,
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Construct a fresh classifier from `config`, discarding any previous
    /// one.
    pub fn configure(&mut self, config: ModelConfig) -> Result<(), ModelError> {
        let model = build_model(config)?;
        self.model = Some(model);
        self.predictions = None;
        Ok(())
    }

    /// Like [`configure`](Self::configure), from a dynamic key/value mapping.
    pub fn configure_from_map(&mut self, hyperparameters: &Map<String, Value>) -> Result<(), ModelError> {
        self.configure(ModelConfig::from_map(hyperparameters)?)
    }

    /// Replace the held classifier with the one stored at the model path.
    pub fn load(&mut self) -> Result<(), ModelError> {
        let model = persist::read_model(&self.model_path)?;
        info!("loaded random forest from {}", self.model_path.display());
        self.model = Some(model);
        self.predictions = None;
        Ok(())
    }

    /// Read-only view of the held classifier.
    pub fn model(&self) -> Result<&ForestModel, ModelError> {
        self.model.as_ref().ok_or(ModelError::NotConfigured)
    }

    /// Hyperparameters in effect on the held classifier.
    pub fn params(&self, options: ParamsOptions) -> Result<BTreeMap<String, Value>, ModelError> {
        Ok(self.model()?.config().to_map(options.deep))
    }

    /// Train the held classifier in place.
    ///
    /// `y` needs at least two distinct classes, otherwise the backend
    /// refuses to fit.
    pub fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<(), ModelError> {
        let model = self.model.as_mut().ok_or(ModelError::NotConfigured)?;
        model.fit(x, y)?;
        self.predictions = None;
        info!("fitted random forest on {} rows x {} features", x.nrows(), x.ncols());
        Ok(())
    }

    /// Predict one label per row and keep the result for [`evaluate`](Self::evaluate).
    pub fn predict(&mut self, x: &Array2<f64>) -> Result<&[Label], ModelError> {
        let predictions = self.model()?.predict(x)?;
        debug!("stored {} predictions", predictions.len());
        let stored = self.predictions.insert(predictions);
        Ok(stored.as_slice())
    }

    /// Predictions from the latest [`predict`](Self::predict) call.
    pub fn predictions(&self) -> Option<&[Label]> {
        self.predictions.as_deref()
    }

    /// Accuracy of the stored predictions against `y_true`.
    pub fn evaluate(&self, y_true: &[Label]) -> Result<f64, ModelError> {
        let predictions = self.predictions.as_deref().ok_or(ModelError::NoPredictions)?;
        let score = metrics::accuracy(y_true, predictions)?;
        debug!("accuracy {:.4} over {} labels", score, y_true.len());
        Ok(score)
    }

    /// Write the held classifier to the model path, overwriting any existing file.
    pub fn save(&self) -> Result<(), ModelError> {
        persist::write_model(&self.model_path, self.model()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn four_rows() -> (Array2<f64>, Vec<Label>) {
        let x = Array2::from_rows(vec![
            vec![0.0, 0.0],
            vec![1.0, 1.0],
            vec![0.1, 0.0],
            vec![0.9, 1.0],
        ])
        .unwrap();
        (x, vec![0, 1, 0, 1])
    }

    #[test]
    fn unconfigured_handle_errors() {
        let (x, y) = four_rows();
        let mut rf = RandomForest::new("unused.bin");
        assert!(matches!(rf.model(), Err(ModelError::NotConfigured)));
        assert!(matches!(rf.params(ParamsOptions::default()), Err(ModelError::NotConfigured)));
        assert!(matches!(rf.fit(&x, &y), Err(ModelError::NotConfigured)));
        assert!(matches!(rf.predict(&x), Err(ModelError::NotConfigured)));
        assert!(matches!(rf.save(), Err(ModelError::NotConfigured)));
    }

    #[test]
    fn predict_requires_fit() {
        let (x, _) = four_rows();
        let mut rf = RandomForest::new("unused.bin");
        rf.configure(ModelConfig::new(3)).unwrap();
        assert!(matches!(rf.predict(&x), Err(ModelError::NotFitted)));
    }

    #[test]
    fn evaluate_requires_predict() {
        let (x, y) = four_rows();
        let mut rf = RandomForest::new("unused.bin");
        rf.configure(ModelConfig::new(3)).unwrap();
        rf.fit(&x, &y).unwrap();
        assert!(matches!(rf.evaluate(&y), Err(ModelError::NoPredictions)));
    }

    #[test]
    fn refit_clears_predictions() {
        let (x, y) = four_rows();
        let mut rf = RandomForest::new("unused.bin");
        rf.configure(ModelConfig::new(3)).unwrap();
        rf.fit(&x, &y).unwrap();
        rf.predict(&x).unwrap();
        assert!(rf.predictions().is_some());
        rf.fit(&x, &y).unwrap();
        assert!(rf.predictions().is_none());
    }

    #[test]
    fn configure_from_map_sets_params() {
        let mut rf = RandomForest::new("unused.bin");
        let hyper = json!({"n_estimators": 10, "max_depth": 4, "criterion": "entropy"});
        rf.configure_from_map(hyper.as_object().unwrap()).unwrap();

        let params = rf.params(ParamsOptions::default()).unwrap();
        assert_eq!(params["n_estimators"], json!(10));
        assert_eq!(params["max_depth"], json!(4));
        assert_eq!(params["criterion"], json!("entropy"));
        assert_eq!(params["min_samples_split"], json!(2));
    }

    #[test]
    fn configure_rejects_unknown_key() {
        let mut rf = RandomForest::new("unused.bin");
        let hyper = json!({"n_estimators": 10, "bogus": 1});
        let err = rf.configure_from_map(hyper.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedHyperparameter { .. }));
        assert!(rf.model().is_err());
    }
}
