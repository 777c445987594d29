//! Utilities for working with Arrow arrays.
//!
//! This module provides utility functions for safely extracting and converting
//! data from Arrow arrays.

use arrow::array::{Array, ArrayRef, StringArray};
use arrow::compute::kernels::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::{Result, TrackHealthError, TrackResultExt};

/// Get a column from a record batch by name
///
/// # Errors
/// Returns `MissingColumn` if the batch has no column with that name
pub fn get_column(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    let idx = batch
        .schema()
        .index_of(column_name)
        .map_err(|_| TrackHealthError::MissingColumn(column_name.to_string()))?;
    Ok(batch.column(idx).clone())
}

/// Downcast an array to a specific type
///
/// # Arguments
/// * `array` - The array to downcast
/// * `column_name` - Name of the column (for error messages)
/// * `type_name` - Name of the expected type (for error messages)
///
/// # Errors
/// Returns an error if the array is not of the requested type
pub fn downcast_array<'a, T: 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    type_name: &str,
) -> Result<&'a T> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        TrackHealthError::InvalidValue {
            column: column_name.to_string(),
            row: 0,
            value: format!("column is {} rather than {type_name}", array.data_type()),
        }
    })
}

/// Convert any array to a `Utf8` string array, casting when necessary
///
/// # Errors
/// Returns an error if Arrow cannot cast the column to text
pub fn to_string_array(array: &ArrayRef, column_name: &str) -> Result<StringArray> {
    let utf8 = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast::cast(array, &DataType::Utf8).with_column_context(column_name)?
    };

    Ok(downcast_array::<StringArray>(&utf8, column_name, "Utf8")?.clone())
}

/// Extract a text column as owned optional values
///
/// # Errors
/// Returns an error if the column is missing or cannot be represented as text
pub fn string_values(batch: &RecordBatch, column_name: &str) -> Result<Vec<Option<String>>> {
    let array = get_column(batch, column_name)?;
    let strings = to_string_array(&array, column_name)?;

    Ok((0..strings.len())
        .map(|i| (!strings.is_null(i)).then(|| strings.value(i).to_string()))
        .collect())
}
