//! Scored track records
//!
//! A pipeline run produces a `ScoredTable`: the Arrow table with the
//! prediction columns appended, and a typed record per row for sorting,
//! filtering and display.

use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::algorithm::condition::Condition;
use crate::error::{Result, TrackHealthError};
use crate::filter::{Expr, evaluate_expr, filter_record_batch, mask_to_indices};
use crate::utils::time::format_path_time;

/// One scored row of the dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    /// Position of the row in the input dataset
    pub row: usize,
    /// Raw `path` value, if present
    pub path: Option<String>,
    /// Timestamp parsed from `path`
    pub path_time: Option<NaiveDateTime>,
    /// Ground-truth label from the dataset
    pub label: String,
    /// Label predicted by the classifier
    pub predicted_label: String,
    /// Condition derived from the predicted label
    pub condition: Condition,
}

impl TrackRecord {
    /// Severity rank of the record's condition
    #[must_use]
    pub fn severity(&self) -> u8 {
        self.condition.severity()
    }

    /// Timestamp for display, or the raw path when it is not a timestamp
    #[must_use]
    pub fn display_time(&self) -> String {
        match (&self.path_time, &self.path) {
            (Some(time), _) => format_path_time(time),
            (None, Some(path)) => path.clone(),
            (None, None) => "unknown".to_string(),
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone)]
pub struct ScoredTable {
    batch: RecordBatch,
    records: Vec<TrackRecord>,
    feature_names: Vec<String>,
}

impl ScoredTable {
    /// Assemble a scored table; `records` must describe the rows of `batch` in order
    ///
    /// # Errors
    /// Returns an error if the record count differs from the batch row count
    pub fn new(
        batch: RecordBatch,
        records: Vec<TrackRecord>,
        feature_names: Vec<String>,
    ) -> Result<Self> {
        if batch.num_rows() != records.len() {
            return Err(TrackHealthError::model_error(format!(
                "scored batch has {} rows but {} records",
                batch.num_rows(),
                records.len()
            )));
        }
        Ok(Self {
            batch,
            records,
            feature_names,
        })
    }

    /// The augmented Arrow table
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Typed per-row view
    #[must_use]
    pub fn records(&self) -> &[TrackRecord] {
        &self.records
    }

    /// Record at dataset row `row`
    #[must_use]
    pub fn record(&self, row: usize) -> Option<&TrackRecord> {
        self.records.get(row)
    }

    /// Names of the feature columns
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows whose condition is `condition`, in dataset order
    #[must_use]
    pub fn rows_with_condition(&self, condition: Condition) -> Vec<usize> {
        self.records
            .iter()
            .filter(|r| r.condition == condition)
            .map(|r| r.row)
            .collect()
    }

    /// Row indices matching a filter expression over the Arrow table
    ///
    /// # Errors
    /// Returns an error if the expression cannot be evaluated
    pub fn matching_rows(&self, expr: &Expr) -> Result<Vec<usize>> {
        let mask = evaluate_expr(&self.batch, expr)?;
        Ok(mask_to_indices(&mask))
    }

    /// Sub-table of the rows matching a filter expression
    ///
    /// # Errors
    /// Returns an error if the expression cannot be evaluated
    pub fn filter(&self, expr: &Expr) -> Result<RecordBatch> {
        let mask = evaluate_expr(&self.batch, expr)?;
        filter_record_batch(&self.batch, &mask)
    }
}
