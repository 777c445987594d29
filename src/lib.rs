//! Railway track health classification.
//!
//! Loads a dataset of vibration features, fits a random forest on it,
//! predicts each row's fault label in-sample and maps the predictions to a
//! three-level condition (Good/OK/Danger). The `dashboard` module turns the
//! scored table into the metrics, emergency list and CSV export an operator
//! works with.

pub mod algorithm;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod schema;
pub mod utils;

// Core types
pub use algorithm::condition::{Condition, map_condition};
pub use algorithm::forest::{ForestConfig, RandomForest};
pub use algorithm::pipeline::{run_pipeline, score_batch, train_and_predict};
pub use config::PipelineConfig;
pub use dashboard::{Dashboard, MaintenanceLog};
pub use error::{Result, TrackHealthError};
pub use models::{ScoredTable, TrackRecord};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Filtering capabilities
pub use filter::{Expr, LiteralValue, evaluate_expr, filter_record_batch};

pub use loader::load_dataset;
