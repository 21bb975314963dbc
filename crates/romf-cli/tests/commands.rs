//! End-to-end tests for the train / predict / evaluate commands.

use std::fmt::Write as _;
use std::path::PathBuf;

use romf_cli::commands;
use tempfile::TempDir;

fn write_dataset(dir: &TempDir, name: &str, with_label: bool) -> PathBuf {
    let mut body = String::from(if with_label { "f1,f2,label\n" } else { "f1,f2\n" });
    for i in 0..15 {
        let jitter = (i % 3) as f64 * 0.1;
        if with_label {
            writeln!(body, "{},{},0", jitter, jitter).unwrap();
            writeln!(body, "{},{},1", 5.0 + jitter, 5.0 - jitter).unwrap();
        } else {
            writeln!(body, "{},{}", jitter, jitter).unwrap();
            writeln!(body, "{},{}", 5.0 + jitter, 5.0 - jitter).unwrap();
        }
    }
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn write_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"n_estimators": 10, "max_depth": 3, "random_state": 1}"#).unwrap();
    path
}

#[test]
fn train_predict_evaluate_round_trip() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let train_data = write_dataset(&dir, "train.csv", true);
    let features = write_dataset(&dir, "features.csv", false);
    let model = dir.path().join("model.romf");

    let summary = commands::train(config, train_data.clone(), model.clone(), None).unwrap();
    assert_eq!(summary.n_train, 30);
    assert_eq!(summary.n_features, 2);
    assert!(summary.held_out_accuracy.is_none());
    assert!(model.exists());

    let predictions = commands::predict(model.clone(), features).unwrap();
    assert_eq!(predictions.len(), 30);

    let accuracy = commands::evaluate(model, train_data).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn train_with_held_out_rows() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let train_data = write_dataset(&dir, "train.csv", true);
    let model = dir.path().join("model.romf");

    let summary = commands::train(config, train_data, model, Some(0.2)).unwrap();
    assert_eq!(summary.n_train, 24);
    let accuracy = summary.held_out_accuracy.unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"n_estimators": 10, "n_jobs": -1}"#).unwrap();
    let train_data = write_dataset(&dir, "train.csv", true);

    let err = commands::train(config, train_data, dir.path().join("m.romf"), None).unwrap_err();
    assert!(err.to_string().contains("Invalid config"));
}

#[test]
fn write_predictions_csv() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("preds.csv");
    commands::write_predictions(&out, &[1, 0, 1]).unwrap();
    let content = std::fs::read_to_string(&out).unwrap();
    assert_eq!(content, "prediction\n1\n0\n1\n");
}
