//! Random forest classifier
//!
//! A bagged ensemble of CART trees with per-split feature subsampling and
//! class-balanced sample weights.

pub mod config;
pub mod ensemble;
pub mod labels;
pub mod sampling;
pub mod tree;

pub use config::{ClassWeight, ForestConfig, MaxFeatures};
pub use ensemble::RandomForest;
pub use labels::LabelEncoder;
pub use tree::{DecisionTree, TreeParams};
