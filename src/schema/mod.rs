//! Column layout of the track dataset and of the scored output table.

use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};

use crate::error::{Result, TrackHealthError};

/// Identifier column; its value doubles as the measurement timestamp
pub const PATH_COLUMN: &str = "path";
/// Ground-truth fault label column
pub const LABEL_COLUMN: &str = "label";
/// Column added with the classifier's prediction
pub const PREDICTED_LABEL_COLUMN: &str = "Predicted_Label";
/// Column added with the derived condition category
pub const CONDITION_COLUMN: &str = "Condition";
/// Severity rank column added for the emergency export
pub const SEVERITY_COLUMN: &str = "Severity";
/// Parsed timestamp column added for the emergency export
pub const PATH_TIME_COLUMN: &str = "path_time";
/// Acknowledgement flag column added for the emergency export
pub const MAINTENANCE_DONE_COLUMN: &str = "Maintenance_Done";

/// Resolved positions of the dataset's columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    /// Index of the path column
    pub path_index: usize,
    /// Index of the label column
    pub label_index: usize,
    /// Indices and names of the feature columns, in file order
    pub features: Vec<(usize, String)>,
}

impl DatasetLayout {
    /// Resolve the layout of a dataset schema
    ///
    /// Every column other than the path and label columns is a feature.
    ///
    /// # Errors
    /// Returns an error if the path or label column is missing, or if no
    /// feature column remains
    pub fn resolve(schema: &Schema, path_column: &str, label_column: &str) -> Result<Self> {
        let path_index = schema
            .index_of(path_column)
            .map_err(|_| TrackHealthError::MissingColumn(path_column.to_string()))?;
        let label_index = schema
            .index_of(label_column)
            .map_err(|_| TrackHealthError::MissingColumn(label_column.to_string()))?;

        let features: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != path_index && *idx != label_index)
            .map(|(idx, field)| (idx, field.name().clone()))
            .collect();

        if features.is_empty() {
            return Err(TrackHealthError::EmptyData(
                "dataset has no feature columns".to_string(),
            ));
        }

        Ok(Self {
            path_index,
            label_index,
            features,
        })
    }

    /// Names of the feature columns
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.features.iter().map(|(_, name)| name.clone()).collect()
    }

    /// Whether the column at `index` is a feature column
    #[must_use]
    pub fn is_feature(&self, index: usize) -> bool {
        index != self.path_index && index != self.label_index
    }
}

/// Build the schema of the scored table
///
/// Path and label keep their positions as text columns, features become
/// `Float64`, and the prediction and condition columns are appended.
#[must_use]
pub fn scored_schema(input: &Schema, layout: &DatasetLayout) -> SchemaRef {
    let mut fields: Vec<Field> = input
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            if layout.is_feature(idx) {
                Field::new(field.name(), DataType::Float64, false)
            } else {
                Field::new(field.name(), DataType::Utf8, idx == layout.path_index)
            }
        })
        .collect();

    fields.push(Field::new(PREDICTED_LABEL_COLUMN, DataType::Utf8, false));
    fields.push(Field::new(CONDITION_COLUMN, DataType::Utf8, false));

    Arc::new(Schema::new(fields))
}
