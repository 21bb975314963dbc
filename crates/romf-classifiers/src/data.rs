//! Dataset helpers.

use log::trace;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::ModelError;
use crate::math::Array2;
use crate::Label;

/// Rows held out for evaluation and rows used for training.
#[derive(Debug, Clone)]
pub struct Split {
    pub x_train: Array2<f64>,
    pub y_train: Vec<Label>,
    pub x_test: Array2<f64>,
    pub y_test: Vec<Label>,
}

/// Shuffle rows with a seeded RNG and hold out `test_fraction` of them.
///
/// The test set gets `ceil(n * test_fraction)` rows; both sides keep at
/// least one row.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &[Label],
    test_fraction: f64,
    seed: u64,
) -> Result<Split, ModelError> {
    if x.nrows() != y.len() {
        return Err(ModelError::ShapeMismatch {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ModelError::InvalidHyperparameter {
            key: "test_fraction".to_string(),
            reason: format!("must be in (0, 1), got {}", test_fraction),
        });
    }
    let n = x.nrows();
    if n < 2 {
        return Err(ModelError::EmptyDataset);
    }

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test_idx, train_idx) = indices.split_at(n_test);
    trace!("split {} rows into {} train / {} test", n, train_idx.len(), test_idx.len());

    Ok(Split {
        x_train: x.select_rows(train_idx),
        y_train: train_idx.iter().map(|&i| y[i]).collect(),
        x_test: x.select_rows(test_idx),
        y_test: test_idx.iter().map(|&i| y[i]).collect(),
    })
}
