//! Integration tests for config files, the metric helper and dataset splits.

use romf_classifiers::config::{load_model_config, Criterion, ModelConfig};
use romf_classifiers::data::train_test_split;
use romf_classifiers::math::Array2;
use romf_classifiers::metrics::accuracy;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn model_config_default_values() {
    let cfg = ModelConfig::default();
    assert_eq!(cfg.n_estimators, 100);
    assert_eq!(cfg.max_depth, None);
    assert_eq!(cfg.criterion, Criterion::Gini);
    assert!(cfg.validate().is_ok());
}

#[test]
fn model_config_round_trips_json() {
    let cfg = ModelConfig::new(12)
        .with_max_depth(4)
        .with_criterion(Criterion::Entropy);
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"criterion\":\"entropy\""));
    let cfg2: ModelConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(cfg, cfg2);
}

#[test]
fn unknown_json_keys_land_in_extra() {
    let cfg: ModelConfig = serde_json::from_str(r#"{"n_estimators": 3, "bootstrap": false}"#).unwrap();
    assert_eq!(cfg.n_estimators, 3);
    assert!(cfg.extra.contains_key("bootstrap"));
    assert!(cfg.validate().is_err());
}

#[test]
fn load_model_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.json");
    std::fs::write(&path, r#"{"n_estimators": 8, "keep_samples": true}"#).unwrap();
    let cfg = load_model_config(&path).unwrap();
    assert_eq!(cfg.n_estimators, 8);
    assert!(cfg.keep_samples());
}

#[test]
fn load_model_config_accepts_log_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rf.json");
    std::fs::write(&path, r#"{"n_estimators": 4, "criterion": "log_loss"}"#).unwrap();
    let cfg = load_model_config(&path).unwrap();
    assert_eq!(cfg.criterion, Criterion::LogLoss);
    assert!(serde_json::to_string(&cfg).unwrap().contains("\"criterion\":\"log_loss\""));
}

#[test]
fn load_model_config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_model_config(dir.path().join("absent.json")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config"));
}

// ---------------------------------------------------------------------------
// Metric / split
// ---------------------------------------------------------------------------

#[test]
fn accuracy_counts_exact_matches() {
    let score = accuracy(&[0, 1, 2, 2], &[0, 1, 1, 2]).unwrap();
    assert!((score - 0.75).abs() < 1e-12);
}

#[test]
fn split_is_disjoint_and_complete() {
    let x = Array2::from_shape_vec((8, 1), (0..8).map(f64::from).collect()).unwrap();
    let y: Vec<u32> = (0..8).collect();
    let split = train_test_split(&x, &y, 0.25, 42).unwrap();

    let mut seen: Vec<u32> = split.y_train.iter().chain(&split.y_test).copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, y);
}
