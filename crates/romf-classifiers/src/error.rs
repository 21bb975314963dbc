use std::path::PathBuf;

/// Errors returned by the model lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A hyperparameter key the backend does not understand.
    #[error("unsupported hyperparameter '{key}'")]
    UnsupportedHyperparameter { key: String },

    /// A known hyperparameter with a value of the wrong type or range.
    #[error("invalid value for hyperparameter '{key}': {reason}")]
    InvalidHyperparameter { key: String, reason: String },

    #[error("no classifier has been configured or loaded")]
    NotConfigured,

    #[error("classifier has not been fitted")]
    NotFitted,

    #[error("no predictions available, call predict first")]
    NoPredictions,

    /// Feature rows and labels disagree in length.
    #[error("feature matrix has {rows} rows but {labels} labels were given")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error("input has {got} features, model was trained on {expected}")]
    FeatureCountMismatch { expected: usize, got: usize },

    /// Predictions and true labels disagree in length.
    #[error("expected {expected} labels, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("dataset has no rows or no feature columns")]
    EmptyDataset,

    #[error("non-finite value at row {row}, column {col}")]
    NonFiniteValue { row: usize, col: usize },

    /// Failure reported by the random forest library.
    #[error("random forest backend failed: {0}")]
    Backend(String),

    #[error("failed to serialize model")]
    SerializeModel { source: Box<bincode::ErrorKind> },

    #[error("failed to deserialize model from {path}")]
    DeserializeModel {
        path: PathBuf,
        source: Box<bincode::ErrorKind>,
    },

    #[error("{path} is not a romf model file")]
    NotAModelFile { path: PathBuf },

    #[error("incompatible model version in {path}: expected {expected}, found {found}")]
    IncompatibleModelVersion {
        expected: u32,
        found: u32,
        path: PathBuf,
    },

    #[error("failed to write model to {path}")]
    WriteModel {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read model from {path}")]
    ReadModel {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<smartcore::error::Failed> for ModelError {
    fn from(err: smartcore::error::Failed) -> Self {
        ModelError::Backend(err.to_string())
    }
}
