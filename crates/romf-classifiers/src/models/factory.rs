use log::debug;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::models::random_forest::ForestModel;
use crate::models::ClassifierModel;

/// Build an unfitted classifier from a `ModelConfig`.
///
/// The config is validated here so that unsupported or out-of-range
/// hyperparameters fail at construction rather than at fit time.
pub fn build_model(config: ModelConfig) -> Result<ForestModel, ModelError> {
    config.validate()?;
    let model = ForestModel::new(config);
    debug!(
        "building {}: n_estimators={}, criterion={}, max_depth={:?}",
        model.name(),
        model.config().n_estimators,
        model.config().criterion,
        model.config().max_depth
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_unfitted_model() {
        let model = build_model(ModelConfig::new(5)).unwrap();
        assert!(!model.is_fitted());
        assert_eq!(model.config().n_estimators, 5);
        assert_eq!(model.name(), "random_forest");
    }

    #[test]
    fn rejects_unsupported_passthrough() {
        let mut config = ModelConfig::default();
        config.extra.insert("warm_start".to_string(), json!(true));
        let err = build_model(config).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedHyperparameter { .. }));
    }
}
