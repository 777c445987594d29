//! Applying filter masks to record batches

use std::collections::HashSet;

use arrow::array::BooleanArray;
use arrow::record_batch::RecordBatch;

use super::{Expr, evaluate_expr};
use crate::algorithm::condition::Condition;
use crate::error::{Result, TrackHealthError, TrackResultExt};

/// Filter a record batch based on a boolean mask
///
/// Rows where the mask is null are dropped.
///
/// # Errors
/// Returns an error if the mask length differs from the batch row count
pub fn filter_record_batch(batch: &RecordBatch, mask: &BooleanArray) -> Result<RecordBatch> {
    if batch.num_rows() != mask.len() {
        return Err(TrackHealthError::filter_error(format!(
            "Mask length ({}) doesn't match batch row count ({})",
            mask.len(),
            batch.num_rows()
        )));
    }

    arrow::compute::filter_record_batch(batch, mask)
        .with_track_context(|| "Failed to apply boolean filter to batch".to_string())
}

/// Trait for objects that can filter record batches
pub trait BatchFilter: std::fmt::Debug {
    /// Filter a record batch
    ///
    /// # Errors
    /// Returns an error if filtering fails
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch>;

    /// Returns the set of column names required by this filter
    fn required_columns(&self) -> HashSet<String>;
}

/// Filter backed by an `Expr`
#[derive(Debug, Clone)]
pub struct ExpressionFilter {
    expr: Expr,
}

impl ExpressionFilter {
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        Self { expr }
    }

    /// Keep only rows with the given condition
    #[must_use]
    pub fn condition(condition: Condition) -> Self {
        Self::new(Expr::condition_is(condition))
    }

    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

impl BatchFilter for ExpressionFilter {
    fn filter(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mask = evaluate_expr(batch, &self.expr)?;
        filter_record_batch(batch, &mask)
    }

    fn required_columns(&self) -> HashSet<String> {
        self.expr.required_columns()
    }
}
