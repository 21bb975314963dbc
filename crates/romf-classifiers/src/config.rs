use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;

/// Passthrough keys forwarded to the backend as-is.
pub const PASSTHROUGH_KEYS: &[&str] = &["keep_samples"];

/// Split quality measure used by every tree in the forest.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    #[default]
    Gini,
    Entropy,
    /// Same split as `Entropy`; kept distinct so the configured name echoes back.
    LogLoss,
    ClassificationError,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
            Criterion::LogLoss => "log_loss",
            Criterion::ClassificationError => "classification_error",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gini" => Ok(Criterion::Gini),
            "entropy" => Ok(Criterion::Entropy),
            "log_loss" => Ok(Criterion::LogLoss),
            "classification_error" => Ok(Criterion::ClassificationError),
            _ => Err(format!(
                "Unknown criterion: {}. Valid options are: gini, entropy, log_loss, classification_error",
                s
            )),
        }
    }
}

/// Hyperparameters for the random forest.
///
/// Known hyperparameters are typed fields. Anything else lands in `extra` and
/// must be one of [`PASSTHROUGH_KEYS`], which [`ModelConfig::validate`]
/// enforces.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Number of trees.
    pub n_estimators: u16,
    /// Maximum tree depth, unbounded when `None`.
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub criterion: Criterion,
    /// Features considered per split, `sqrt(n_features)` when `None`.
    pub max_features: Option<usize>,
    pub random_state: u64,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
            max_features: None,
            random_state: 0,
            extra: BTreeMap::new(),
        }
    }
}

impl ModelConfig {
    pub fn new(n_estimators: u16) -> Self {
        Self {
            n_estimators,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    #[must_use]
    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    #[must_use]
    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Build a config from a dynamic key/value mapping, filling defaults for
    /// missing keys.
    ///
    /// # Errors
    ///
    /// Fails on values of the wrong type and on anything [`validate`](Self::validate)
    /// rejects.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ModelError> {
        let mut config = Self::default();

        for (key, value) in map {
            match key.as_str() {
                "n_estimators" => config.n_estimators = as_u16(key, value)?,
                "max_depth" => {
                    config.max_depth = if value.is_null() {
                        None
                    } else {
                        Some(as_u16(key, value)?)
                    }
                }
                "min_samples_split" => config.min_samples_split = as_usize(key, value)?,
                "min_samples_leaf" => config.min_samples_leaf = as_usize(key, value)?,
                "criterion" => {
                    let name = value.as_str().ok_or_else(|| invalid(key, "expected a string"))?;
                    config.criterion = name.parse().map_err(|e: String| invalid(key, &e))?;
                }
                "max_features" => {
                    config.max_features = if value.is_null() {
                        None
                    } else {
                        Some(as_usize(key, value)?)
                    }
                }
                "random_state" => {
                    config.random_state = if value.is_null() {
                        0
                    } else {
                        value
                            .as_u64()
                            .ok_or_else(|| invalid(key, "expected a non-negative integer"))?
                    }
                }
                _ => {
                    config.extra.insert(key.clone(), value.clone());
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check ranges and passthrough keys.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(invalid("n_estimators", "must be at least 1"));
        }
        if self.max_depth == Some(0) {
            return Err(invalid("max_depth", "must be at least 1"));
        }
        if self.min_samples_split < 2 {
            return Err(invalid("min_samples_split", "must be at least 2"));
        }
        if self.min_samples_leaf == 0 {
            return Err(invalid("min_samples_leaf", "must be at least 1"));
        }
        if self.max_features == Some(0) {
            return Err(invalid("max_features", "must be at least 1"));
        }

        for (key, value) in &self.extra {
            if !PASSTHROUGH_KEYS.contains(&key.as_str()) {
                return Err(ModelError::UnsupportedHyperparameter { key: key.clone() });
            }
            if key == "keep_samples" && !value.is_boolean() {
                return Err(invalid(key, "expected a boolean"));
            }
        }
        Ok(())
    }

    /// Whether the backend should keep the per-tree bootstrap samples.
    pub fn keep_samples(&self) -> bool {
        self.extra
            .get("keep_samples")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Flat view of the effective hyperparameters.
    ///
    /// With `deep` the parameters handed to each tree are repeated under an
    /// `estimator__` prefix.
    pub fn to_map(&self, deep: bool) -> BTreeMap<String, Value> {
        let mut tree = BTreeMap::new();
        tree.insert("criterion".to_string(), Value::from(self.criterion.as_str()));
        tree.insert("max_depth".to_string(), json_opt(self.max_depth.map(u64::from)));
        tree.insert("min_samples_leaf".to_string(), Value::from(self.min_samples_leaf));
        tree.insert("min_samples_split".to_string(), Value::from(self.min_samples_split));
        tree.insert("random_state".to_string(), Value::from(self.random_state));

        let mut params = tree.clone();
        params.insert("n_estimators".to_string(), Value::from(self.n_estimators));
        params.insert("max_features".to_string(), json_opt(self.max_features.map(|m| m as u64)));
        params.insert("keep_samples".to_string(), Value::from(self.keep_samples()));

        if deep {
            for (key, value) in tree {
                params.insert(format!("estimator__{}", key), value);
            }
        }
        params
    }
}

/// Load and validate a model configuration from a JSON file.
pub fn load_model_config<P: AsRef<Path>>(path: P) -> Result<ModelConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: ModelConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid config: {}", path.as_ref().display()))?;
    Ok(config)
}

fn invalid(key: &str, reason: &str) -> ModelError {
    ModelError::InvalidHyperparameter {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn as_usize(key: &str, value: &Value) -> Result<usize, ModelError> {
    value
        .as_u64()
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| invalid(key, "expected a non-negative integer"))
}

fn as_u16(key: &str, value: &Value) -> Result<u16, ModelError> {
    value
        .as_u64()
        .and_then(|v| u16::try_from(v).ok())
        .ok_or_else(|| invalid(key, "expected an integer in 0..=65535"))
}

fn json_opt(value: Option<u64>) -> Value {
    value.map(Value::from).unwrap_or(Value::Null)
}
