//! Dense feature matrix used at the crate boundary.
//!
//! `Array2` is a small row-major container with a checked shape. It is
//! converted to the backend's own matrix type only when a model is fitted or
//! queried.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
