//! Classification metrics.

use crate::error::ModelError;
use crate::Label;

/// Fraction of positions where `predicted` equals `truth`.
///
/// The score itself comes from smartcore; this wrapper turns the length
/// precondition into an error instead of a panic.
pub fn accuracy(truth: &[Label], predicted: &[Label]) -> Result<f64, ModelError> {
    if truth.len() != predicted.len() {
        return Err(ModelError::LengthMismatch {
            expected: predicted.len(),
            got: truth.len(),
        });
    }
    if truth.is_empty() {
        return Err(ModelError::EmptyDataset);
    }
    Ok(smartcore::metrics::accuracy(&truth.to_vec(), &predicted.to_vec()))
}
