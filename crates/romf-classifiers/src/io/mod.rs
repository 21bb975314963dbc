//! IO utilities for loading datasets from delimited text files.

pub mod csv_dataset;

pub use csv_dataset::{read_feature_csv, read_labeled_csv, DatasetReaderConfig, LabeledData};
