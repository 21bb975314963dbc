use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use romf_classifiers::config::load_model_config;
use romf_classifiers::data::train_test_split;
use romf_classifiers::io::{read_feature_csv, read_labeled_csv, DatasetReaderConfig};
use romf_classifiers::{Label, RandomForest};

/// Outcome of a `train` run.
#[derive(Debug)]
pub struct TrainSummary {
    pub n_train: usize,
    pub n_features: usize,
    /// Accuracy on the held-out rows, when a test fraction was requested.
    pub held_out_accuracy: Option<f64>,
}

/// Fit a forest from a JSON config and a labeled dataset, then save it.
pub fn train<P: AsRef<Path>>(
    config_path: P,
    train_data: P,
    output_file: P,
    test_fraction: Option<f64>,
) -> Result<TrainSummary> {
    let config = load_model_config(&config_path)?;
    let seed = config.random_state;
    let data = read_labeled_csv(&train_data, &DatasetReaderConfig::for_path(&train_data))?;

    let mut rf = RandomForest::new(output_file.as_ref());
    rf.configure(config)?;

    let summary = match test_fraction {
        Some(fraction) => {
            let split = train_test_split(&data.x, &data.y, fraction, seed)?;
            rf.fit(&split.x_train, &split.y_train)?;
            rf.predict(&split.x_test)?;
            let accuracy = rf.evaluate(&split.y_test)?;
            info!(
                "held-out accuracy {:.4} on {} rows",
                accuracy,
                split.y_test.len()
            );
            TrainSummary {
                n_train: split.y_train.len(),
                n_features: data.x.ncols(),
                held_out_accuracy: Some(accuracy),
            }
        }
        None => {
            rf.fit(&data.x, &data.y)?;
            TrainSummary {
                n_train: data.y.len(),
                n_features: data.x.ncols(),
                held_out_accuracy: None,
            }
        }
    };

    rf.save()
        .with_context(|| format!("Failed to save model: {}", output_file.as_ref().display()))?;
    Ok(summary)
}

/// Load a saved forest and predict labels for every row of `data`.
pub fn predict<P: AsRef<Path>>(model_path: P, data: P) -> Result<Vec<Label>> {
    let mut rf = RandomForest::new(model_path.as_ref());
    rf.load()?;
    let features = read_feature_csv(&data, &DatasetReaderConfig::for_path(&data))?;
    Ok(rf.predict(&features.x)?.to_vec())
}

/// Load a saved forest and report its accuracy on a labeled dataset.
pub fn evaluate<P: AsRef<Path>>(model_path: P, data: P) -> Result<f64> {
    let mut rf = RandomForest::new(model_path.as_ref());
    rf.load()?;
    let labeled = read_labeled_csv(&data, &DatasetReaderConfig::for_path(&data))?;
    rf.predict(&labeled.x)?;
    Ok(rf.evaluate(&labeled.y)?)
}

/// Write predictions as a single-column CSV with a `prediction` header.
pub fn write_predictions<P: AsRef<Path>>(path: P, predictions: &[Label]) -> Result<()> {
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create output file: {}", path.as_ref().display()))?;
    writer.write_record(["prediction"])?;
    for label in predictions {
        writer.write_record([label.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
