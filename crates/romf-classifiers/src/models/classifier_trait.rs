use crate::error::ModelError;
use crate::math::Array2;
use crate::Label;

/// Contract between the lifecycle handle and a concrete library binding.
pub trait ClassifierModel {
    /// Train in place, replacing any previously fitted state.
    fn fit(&mut self, x: &Array2<f64>, y: &[Label]) -> Result<(), ModelError>;

    /// Predict one label per row of `x`.
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<Label>, ModelError>;

    fn is_fitted(&self) -> bool;

    /// Number of feature columns seen during fit, `None` before fitting.
    fn n_features(&self) -> Option<usize>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
