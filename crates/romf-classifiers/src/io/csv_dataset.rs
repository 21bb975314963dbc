//! Delimited-text dataset reader.
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;

use crate::math::Array2;
use crate::Label;

/// Features and labels loaded from disk.
#[derive(Debug)]
pub struct LabeledData {
    pub x: Array2<f64>,
    pub y: Vec<Label>,
    pub feature_names: Vec<String>,
}

/// Configuration for reading CSV/TSV datasets.
#[derive(Debug, Clone)]
pub struct DatasetReaderConfig {
    /// Column name holding class labels.
    pub label_column: String,
    pub delimiter: u8,
    /// Optional list of feature columns to load (in order).
    /// When `None`, every column except the label column is a feature.
    pub feature_columns: Option<Vec<String>>,
}

impl Default for DatasetReaderConfig {
    fn default() -> Self {
        Self {
            label_column: "label".to_string(),
            delimiter: b',',
            feature_columns: None,
        }
    }
}

impl DatasetReaderConfig {
    /// Default config with the delimiter picked from the file extension
    /// (`.tsv` means tab, anything else comma).
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        let is_tsv = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.eq_ignore_ascii_case("tsv"))
            .unwrap_or(false);
        Self {
            delimiter: if is_tsv { b'\t' } else { b',' },
            ..Self::default()
        }
    }
}

/// Read a file with a header row, a label column and numeric feature columns.
pub fn read_labeled_csv<P: AsRef<Path>>(path: P, config: &DatasetReaderConfig) -> Result<LabeledData> {
    read_csv(path.as_ref(), config, true)
}

/// Read feature columns only. A label column, if present, is ignored.
pub fn read_feature_csv<P: AsRef<Path>>(path: P, config: &DatasetReaderConfig) -> Result<LabeledData> {
    read_csv(path.as_ref(), config, false)
}

fn read_csv(path: &Path, config: &DatasetReaderConfig, with_labels: bool) -> Result<LabeledData> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("Failed to read dataset header row")?
        .clone();

    let label_idx = find_column(&headers, &config.label_column);
    if with_labels && label_idx.is_none() {
        return Err(anyhow!("Missing label column '{}'", config.label_column));
    }

    let feature_indices = resolve_feature_indices(&headers, config, label_idx)?;
    if feature_indices.is_empty() {
        return Err(anyhow!("No feature columns detected in {}", path.display()));
    }
    let feature_names = feature_indices
        .iter()
        .map(|&i| headers[i].to_string())
        .collect::<Vec<_>>();

    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut nrows = 0usize;

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        if with_labels {
            let idx = label_idx.unwrap_or(usize::MAX);
            let label = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing label value at row {}", row_idx + 1))?
                .parse::<Label>()
                .with_context(|| format!("Invalid label at row {}", row_idx + 1))?;
            labels.push(label);
        }

        for &idx in &feature_indices {
            let value = record
                .get(idx)
                .ok_or_else(|| anyhow!("Missing value for '{}' at row {}", &headers[idx], row_idx + 1))?
                .parse::<f64>()
                .with_context(|| {
                    format!("Invalid value for '{}' at row {}", &headers[idx], row_idx + 1)
                })?;
            features.push(value);
        }
        nrows += 1;
    }

    log::debug!(
        "read {} rows x {} features from {}",
        nrows,
        feature_indices.len(),
        path.display()
    );

    let x = Array2::from_shape_vec((nrows, feature_indices.len()), features)?;
    Ok(LabeledData {
        x,
        y: labels,
        feature_names,
    })
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.eq_ignore_ascii_case(name))
}

fn resolve_feature_indices(
    headers: &StringRecord,
    config: &DatasetReaderConfig,
    label_idx: Option<usize>,
) -> Result<Vec<usize>> {
    match &config.feature_columns {
        Some(columns) => columns
            .iter()
            .map(|name| {
                find_column(headers, name).ok_or_else(|| anyhow!("Missing feature column '{}'", name))
            })
            .collect(),
        None => Ok((0..headers.len()).filter(|&i| Some(i) != label_idx).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_labels_and_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "train.csv", "a,label,b\n0.5,1,2\n1.5,0,3\n");
        let data = read_labeled_csv(&path, &DatasetReaderConfig::default()).unwrap();
        assert_eq!(data.x.shape(), (2, 2));
        assert_eq!(data.x.row_slice(1), &[1.5, 3.0]);
        assert_eq!(data.y, vec![1, 0]);
        assert_eq!(data.feature_names, vec!["a", "b"]);
    }

    #[test]
    fn tsv_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "train.tsv", "x\tlabel\n1\t0\n2\t1\n");
        let data = read_labeled_csv(&path, &DatasetReaderConfig::for_path(&path)).unwrap();
        assert_eq!(data.x.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn feature_only_ignores_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "test.csv", "a,b\n1,2\n");
        let data = read_feature_csv(&path, &DatasetReaderConfig::default()).unwrap();
        assert_eq!(data.x.shape(), (1, 2));
        assert!(data.y.is_empty());
    }

    #[test]
    fn missing_label_column_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "train.csv", "a,b\n1,2\n");
        assert!(read_labeled_csv(&path, &DatasetReaderConfig::default()).is_err());
    }

    #[test]
    fn bad_value_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "train.csv", "a,label\nx,1\n");
        let err = read_labeled_csv(&path, &DatasetReaderConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid value for 'a'"));
    }
}
