//! romf-classifiers: a lifecycle wrapper around a random forest classifier.
//!
//! The crate does not grow trees itself. Training, prediction and accuracy
//! scoring are delegated to `smartcore`; this crate adds a typed
//! hyperparameter layer, a stateful handle (`RandomForest`) with an explicit
//! configure/fit/predict/evaluate/save/load lifecycle, a versioned model file
//! and a few dataset helpers used by the command line tool.
pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod lifecycle;
pub mod math;
pub mod metrics;
pub mod models;
pub mod persist;

pub use config::{Criterion, ModelConfig};
pub use error::ModelError;
pub use lifecycle::{ParamsOptions, RandomForest};
pub use math::Array2;

/// Class label type used across the crate.
pub type Label = u32;
