//! Numeric coercion of feature columns.
//!
//! Missing cells become `NaN` in the returned vectors; the imputer replaces
//! them afterwards.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::{DataType, Float64Type};

use crate::error::{Result, TrackHealthError, TrackResultExt};

/// Text values treated as a missing cell (compared case-insensitively)
const MISSING_TOKENS: &[&str] = &["", "nan", "na", "n/a", "null", "none"];

/// Coerce one feature column to `f64`, marking missing cells as `NaN`
///
/// Integer, float, decimal and boolean columns are cast; text columns are
/// parsed cell by cell.
///
/// # Errors
/// Returns `InvalidValue` for a cell that is neither missing nor a finite number,
/// or for a column of a type that has no numeric reading
pub fn coerce_to_f64(array: &ArrayRef, column: &str) -> Result<Vec<f64>> {
    match array.data_type() {
        DataType::Utf8 => parse_text(array.as_string::<i32>(), column),
        DataType::LargeUtf8 => parse_text(array.as_string::<i64>(), column),
        DataType::Null => Ok(vec![f64::NAN; array.len()]),
        dt if dt.is_numeric() || *dt == DataType::Boolean => {
            let floats = cast::cast(array, &DataType::Float64).with_column_context(column)?;
            let floats = floats.as_primitive::<Float64Type>();
            floats
                .iter()
                .enumerate()
                .map(|(row, value)| match value {
                    Some(v) if v.is_infinite() => Err(invalid(column, row, v.to_string())),
                    Some(v) => Ok(v),
                    None => Ok(f64::NAN),
                })
                .collect()
        }
        other => Err(TrackHealthError::InvalidValue {
            column: column.to_string(),
            row: 0,
            value: format!("unsupported column type {other}"),
        }),
    }
}

fn parse_text<'a, I>(values: I, column: &str) -> Result<Vec<f64>>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(f64::NAN),
            Some(text) => parse_cell(text).ok_or_else(|| invalid(column, row, text.to_string())),
        })
        .collect()
}

/// Parse a single text cell; `None` means the cell is not a usable number
fn parse_cell(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if MISSING_TOKENS
        .iter()
        .any(|token| trimmed.eq_ignore_ascii_case(token))
    {
        return Some(f64::NAN);
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_infinite() => None,
        Ok(v) => Some(v),
        Err(_) => None,
    }
}

fn invalid(column: &str, row: usize, value: String) -> TrackHealthError {
    TrackHealthError::InvalidValue {
        column: column.to_string(),
        row,
        value,
    }
}
