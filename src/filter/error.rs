//! Error helpers for the filter module

use crate::error::{Result, TrackHealthError};

/// Fail with a filter error
pub fn filter_err<T>(message: impl Into<String>) -> Result<T> {
    Err(TrackHealthError::filter_error(message))
}

/// Fail because a column the expression names is absent
pub fn column_not_found<T>(column_name: &str) -> Result<T> {
    filter_err(format!("Column '{column_name}' not found"))
}

/// Fail because a column cannot be compared with the literal's type
pub fn column_type_error<T>(column_name: &str, expected_type: &str) -> Result<T> {
    filter_err(format!(
        "Column '{column_name}' is not a {expected_type} array"
    ))
}
