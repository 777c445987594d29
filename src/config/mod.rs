//! Configuration for the track health pipeline.

use std::fmt;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::algorithm::forest::ForestConfig;
use crate::error::{Result, TrackHealthError, safe_open_file};
use crate::schema::{LABEL_COLUMN, PATH_COLUMN};

/// Dataset file read when no other path is configured
pub const DEFAULT_DATASET_FILE: &str = "vibration_fault_classification_random_forest.csv";

/// File name offered for the emergency alert export
pub const DEFAULT_EXPORT_FILE: &str = "railway_emergency_alerts.csv";

/// Configuration for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Location of the dataset (delimited text or Parquet)
    pub dataset_path: PathBuf,
    /// Name of the identifying column that also carries the timestamp
    pub path_column: String,
    /// Name of the ground-truth label column
    pub label_column: String,
    /// Classifier hyperparameters
    pub forest: ForestConfig,
    /// Show a progress bar while the forest is fitted
    pub show_progress: bool,
    /// File name used when exporting emergency alerts
    pub export_file_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_FILE),
            path_column: PATH_COLUMN.to_string(),
            label_column: LABEL_COLUMN.to_string(),
            forest: ForestConfig::default(),
            show_progress: false,
            export_file_name: DEFAULT_EXPORT_FILE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file; absent keys keep their defaults
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, parsed or validated
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "pipeline configuration")?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| TrackHealthError::from(e).with_path(path))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the dataset path
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// Returns a configuration error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.path_column.is_empty() || self.label_column.is_empty() {
            return Err(TrackHealthError::Config(
                "path and label column names must not be empty".to_string(),
            ));
        }
        if self.path_column == self.label_column {
            return Err(TrackHealthError::Config(format!(
                "path and label columns must differ (both are '{}')",
                self.path_column
            )));
        }
        self.forest.validate()
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Dataset: {}", self.dataset_path.display())?;
        writeln!(f, "  Path Column: {}", self.path_column)?;
        writeln!(f, "  Label Column: {}", self.label_column)?;
        write!(f, "{}", self.forest)
    }
}
