//! Track health classification
//!
//! Preprocessing, the random forest classifier, the label-to-condition map
//! and the pipeline that chains them.

pub mod condition;
pub mod forest;
pub mod pipeline;
pub mod preprocess;

pub use condition::{Condition, map_condition};
pub use forest::{ForestConfig, RandomForest};
pub use pipeline::{PipelineOutput, TrainedModel, run_pipeline, score_batch, train_and_predict};
pub use preprocess::{PreparedFeatures, prepare_features};
