//! Model file reading and writing.
//!
//! A model file is laid out as:
//!
//! | Part | Encoding |
//! |---|---|
//! | magic `ROMF` | 4 raw bytes |
//! | format version | bincode `u32` |
//! | header (timestamp, crate version, feature count, config) | bincode |
//! | forest | bincode of smartcore's serde representation |
//!
//! The forest part is never inspected; it round-trips through the backend's
//! own `Serialize`/`Deserialize` impls.

use std::path::Path;

use bincode::Options;
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::models::random_forest::{ForestModel, SmartForest};
use crate::models::ClassifierModel;

const MAGIC: [u8; 4] = *b"ROMF";

/// Current binary format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct ModelHeader {
    saved_at: DateTime<Utc>,
    crate_version: String,
    n_features: usize,
    /// JSON, since the config's passthrough map is not bincode friendly.
    config_json: String,
}

/// Write a fitted model to `path`, creating or truncating the file.
///
/// The whole file is encoded in memory first, so a serialization failure
/// leaves any existing file untouched.
pub fn write_model(path: &Path, model: &ForestModel) -> Result<(), ModelError> {
    let forest = model.forest().ok_or(ModelError::NotFitted)?;
    let n_features = model.n_features().ok_or(ModelError::NotFitted)?;

    let header = ModelHeader {
        saved_at: Utc::now(),
        crate_version: env!("CARGO_PKG_VERSION").to_string(),
        n_features,
        config_json: serde_json::to_string(model.config()).map_err(|e| {
            ModelError::SerializeModel {
                source: Box::new(bincode::ErrorKind::Custom(e.to_string())),
            }
        })?,
    };

    let mut bytes = MAGIC.to_vec();
    bincode::serialize_into(&mut bytes, &FORMAT_VERSION).map_err(serialize_error)?;
    bincode::serialize_into(&mut bytes, &header).map_err(serialize_error)?;
    bincode::serialize_into(&mut bytes, forest).map_err(serialize_error)?;

    std::fs::write(path, &bytes).map_err(|source| ModelError::WriteModel {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "model saved to {} ({} bytes, n_estimators={}, n_features={})",
        path.display(),
        bytes.len(),
        model.config().n_estimators,
        n_features
    );
    Ok(())
}

/// Read a model previously written by [`write_model`].
pub fn read_model(path: &Path) -> Result<ForestModel, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::ReadModel {
        path: path.to_path_buf(),
        source,
    })?;

    let mut payload = match bytes.strip_prefix(&MAGIC[..]) {
        Some(rest) => rest,
        None => {
            return Err(ModelError::NotAModelFile {
                path: path.to_path_buf(),
            })
        }
    };

    let version: u32 = decode(path, &mut payload)?;
    if version != FORMAT_VERSION {
        return Err(ModelError::IncompatibleModelVersion {
            expected: FORMAT_VERSION,
            found: version,
            path: path.to_path_buf(),
        });
    }

    let header: ModelHeader = decode(path, &mut payload)?;
    let config: ModelConfig = serde_json::from_str(&header.config_json).map_err(|e| {
        deserialize_error(path, Box::new(bincode::ErrorKind::Custom(e.to_string())))
    })?;
    config.validate()?;
    let forest: SmartForest = decode(path, &mut payload)?;

    debug!(
        "model loaded from {}: saved_at={}, written by romf-classifiers {}, n_features={}",
        path.display(),
        header.saved_at,
        header.crate_version,
        header.n_features
    );

    Ok(ForestModel::from_parts(config, forest, header.n_features))
}

/// Decode the next value, never reading past the bytes that remain.
///
/// The limit turns a corrupt length prefix into a size error instead of an
/// oversized allocation.
fn decode<T: DeserializeOwned>(path: &Path, payload: &mut &[u8]) -> Result<T, ModelError> {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
        .with_limit(payload.len() as u64)
        .deserialize_from(payload)
        .map_err(|e| deserialize_error(path, e))
}

fn deserialize_error(path: &Path, source: Box<bincode::ErrorKind>) -> ModelError {
    ModelError::DeserializeModel {
        path: path.to_path_buf(),
        source,
    }
}

fn serialize_error(source: Box<bincode::ErrorKind>) -> ModelError {
    ModelError::SerializeModel { source }
}
