//! Row filtering over Arrow record batches
//!
//! This module provides a small expression language for selecting rows of
//! the scored table, e.g. all rows whose `Condition` is `Danger`.

pub mod core;
pub mod error;

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, Int64Array, Scalar, StringArray};
use arrow::compute::kernels::cast;
use arrow::compute::kernels::cmp::{eq, neq};
use arrow::compute::{and, is_not_null, is_null, not, or};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::algorithm::condition::Condition;
use crate::error::{Result, TrackResultExt};
use crate::schema::CONDITION_COLUMN;

pub use self::core::{BatchFilter, ExpressionFilter, filter_record_batch};
use self::error::{column_not_found, column_type_error, filter_err};

/// Represents a filter expression over a record batch
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Column is null
    IsNull(String),

    /// Column is not null
    IsNotNull(String),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Boolean value
    Boolean(bool),

    /// Integer value
    Int(i64),

    /// Floating point value
    Float(f64),

    /// String value
    String(String),
}

impl Expr {
    /// Rows whose `Condition` column equals `condition`
    #[must_use]
    pub fn condition_is(condition: Condition) -> Self {
        Self::Eq(
            CONDITION_COLUMN.to_string(),
            LiteralValue::String(condition.as_str().to_string()),
        )
    }

    /// String equality on a column
    #[must_use]
    pub fn eq_str(column: &str, value: &str) -> Self {
        Self::Eq(column.to_string(), LiteralValue::String(value.to_string()))
    }

    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _)
            | Self::NotEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _)
            | Self::IsNull(col)
            | Self::IsNotNull(col) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }
}

/// Evaluates a filter expression against a record batch
///
/// Comparisons against null cells yield null, which selects nothing.
///
/// # Returns
/// A boolean array indicating which rows match the filter
///
/// # Errors
/// Returns an error if a column is missing or has a type the literal cannot be compared with
pub fn evaluate_expr(batch: &RecordBatch, expr: &Expr) -> Result<BooleanArray> {
    let rows = batch.num_rows();
    match expr {
        Expr::AlwaysTrue => Ok(BooleanArray::from(vec![true; rows])),
        Expr::AlwaysFalse => Ok(BooleanArray::from(vec![false; rows])),
        Expr::And(exprs) => combine(batch, exprs, true),
        Expr::Or(exprs) => combine(batch, exprs, false),
        Expr::Not(inner) => {
            let mask = evaluate_expr(batch, inner)?;
            not(&mask).with_track_context(|| "Failed to apply NOT to filter mask".to_string())
        }
        Expr::Eq(col, value) => compare(batch, col, value, false),
        Expr::NotEq(col, value) => compare(batch, col, value, true),
        Expr::In(col, values) => {
            let alternatives = values
                .iter()
                .map(|v| Expr::Eq(col.clone(), v.clone()))
                .collect::<Vec<_>>();
            combine(batch, &alternatives, false)
        }
        Expr::NotIn(col, values) => {
            let inside = evaluate_expr(batch, &Expr::In(col.clone(), values.clone()))?;
            Ok(not(&inside)?)
        }
        Expr::IsNull(col) => Ok(is_null(lookup(batch, col)?.as_ref())?),
        Expr::IsNotNull(col) => Ok(is_not_null(lookup(batch, col)?.as_ref())?),
    }
}

/// Indices of the rows a mask selects; null entries are not selected
#[must_use]
pub fn mask_to_indices(mask: &BooleanArray) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, selected)| (selected == Some(true)).then_some(i))
        .collect()
}

/// AND (`all == true`) or OR of sub-expressions; the empty case is the identity
fn combine(batch: &RecordBatch, exprs: &[Expr], all: bool) -> Result<BooleanArray> {
    let Some((first, rest)) = exprs.split_first() else {
        return Ok(BooleanArray::from(vec![all; batch.num_rows()]));
    };

    let mut result = evaluate_expr(batch, first)?;
    for expr in rest {
        let mask = evaluate_expr(batch, expr)?;
        result = if all {
            and(&result, &mask)?
        } else {
            or(&result, &mask)?
        };
    }
    Ok(result)
}

fn lookup(batch: &RecordBatch, col_name: &str) -> Result<ArrayRef> {
    match batch.schema().index_of(col_name) {
        Ok(idx) => Ok(batch.column(idx).clone()),
        Err(_) => column_not_found(col_name),
    }
}

/// Evaluates an equality (or inequality) comparison against a literal
fn compare(
    batch: &RecordBatch,
    col_name: &str,
    value: &LiteralValue,
    negate: bool,
) -> Result<BooleanArray> {
    let column = lookup(batch, col_name)?;
    let data_type = column.data_type().clone();

    let (lhs, rhs): (ArrayRef, ArrayRef) = match value {
        LiteralValue::String(s) => {
            if !matches!(data_type, DataType::Utf8 | DataType::LargeUtf8) {
                return column_type_error(col_name, "string");
            }
            let lhs = cast::cast(&column, &DataType::Utf8).with_column_context(col_name)?;
            (lhs, Arc::new(StringArray::from(vec![s.as_str()])) as ArrayRef)
        }
        LiteralValue::Int(n) => {
            if !data_type.is_integer() {
                return column_type_error(col_name, "integer");
            }
            let lhs = cast::cast(&column, &DataType::Int64).with_column_context(col_name)?;
            (lhs, Arc::new(Int64Array::from(vec![*n])) as ArrayRef)
        }
        LiteralValue::Float(f) => {
            if !data_type.is_numeric() {
                return column_type_error(col_name, "numeric");
            }
            let lhs = cast::cast(&column, &DataType::Float64).with_column_context(col_name)?;
            (lhs, Arc::new(Float64Array::from(vec![*f])) as ArrayRef)
        }
        LiteralValue::Boolean(b) => {
            if data_type != DataType::Boolean {
                return column_type_error(col_name, "boolean");
            }
            (column, Arc::new(BooleanArray::from(vec![*b])) as ArrayRef)
        }
    };

    let rhs = Scalar::new(rhs);
    let result = if negate { neq(&lhs, &rhs) } else { eq(&lhs, &rhs) };
    result.or_else(|e| filter_err(format!("Comparison on column '{col_name}' failed: {e}")))
}

#[cfg(test)]
mod tests {
    use arrow::datatypes::{Field, Schema};

    use super::*;

    fn batch() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Condition", DataType::Utf8, true),
            Field::new("Severity", DataType::Int32, false),
            Field::new("Maintenance_Done", DataType::Boolean, false),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![
                    Some("Good"),
                    Some("Danger"),
                    None,
                    Some("OK"),
                    Some("Danger"),
                ])),
                Arc::new(arrow::array::Int32Array::from(vec![1, 3, 3, 2, 3])),
                Arc::new(BooleanArray::from(vec![false, true, false, false, false])),
            ],
        )
        .expect("batch")
    }

    fn rows(expr: &Expr) -> Vec<usize> {
        mask_to_indices(&evaluate_expr(&batch(), expr).expect("evaluates"))
    }

    #[test]
    fn condition_equality_selects_matching_rows() {
        assert_eq!(rows(&Expr::condition_is(Condition::Danger)), vec![1, 4]);
        assert_eq!(rows(&Expr::condition_is(Condition::Good)), vec![0]);
    }

    #[test]
    fn null_cells_never_match() {
        assert_eq!(
            rows(&Expr::NotEq("Condition".into(), LiteralValue::String("Good".into()))),
            vec![1, 3, 4]
        );
        assert_eq!(rows(&Expr::IsNull("Condition".into())), vec![2]);
    }

    #[test]
    fn combinators() {
        let open_danger = Expr::And(vec![
            Expr::condition_is(Condition::Danger),
            Expr::Eq("Maintenance_Done".into(), LiteralValue::Boolean(false)),
        ]);
        assert_eq!(rows(&open_danger), vec![4]);

        let in_set = Expr::In(
            "Condition".into(),
            vec![
                LiteralValue::String("Good".into()),
                LiteralValue::String("OK".into()),
            ],
        );
        assert_eq!(rows(&in_set), vec![0, 3]);
        assert_eq!(rows(&Expr::Not(Box::new(Expr::AlwaysTrue))), Vec::<usize>::new());
        assert_eq!(rows(&Expr::Or(vec![])), Vec::<usize>::new());
        assert_eq!(rows(&Expr::And(vec![])), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn integer_literals_compare_after_widening() {
        assert_eq!(rows(&Expr::Eq("Severity".into(), LiteralValue::Int(3))), vec![1, 2, 4]);
    }

    #[test]
    fn type_mismatch_and_missing_columns_are_errors() {
        let batch = batch();
        assert!(evaluate_expr(&batch, &Expr::Eq("Severity".into(), LiteralValue::String("3".into()))).is_err());
        assert!(evaluate_expr(&batch, &Expr::IsNull("nope".into())).is_err());
    }

    #[test]
    fn required_columns_are_collected() {
        let expr = Expr::And(vec![
            Expr::condition_is(Condition::Danger),
            Expr::Not(Box::new(Expr::IsNull("path".into()))),
        ]);
        let cols = expr.required_columns();
        assert!(cols.contains("Condition") && cols.contains("path"));
        assert_eq!(cols.len(), 2);
    }
}
