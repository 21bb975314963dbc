pub mod classifier_trait;
pub mod factory;
pub mod random_forest;

pub use classifier_trait::ClassifierModel;
pub use random_forest::ForestModel;
