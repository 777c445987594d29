//! Feature preprocessing
//!
//! Turns the feature columns of a loaded dataset into two matrices: the
//! imputed values (what the scored table reports) and their standardized
//! form (what the classifier is trained on).

pub mod coercion;
pub mod imputation;
pub mod scaling;

use arrow::record_batch::RecordBatch;
use ndarray::Array2;

use crate::error::{Result, TrackHealthError};
use crate::schema::DatasetLayout;

pub use coercion::coerce_to_f64;
pub use imputation::MeanImputer;
pub use scaling::StandardScaler;

/// Output of preprocessing
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    /// Feature column names, in column order of the matrices
    pub feature_names: Vec<String>,
    /// Feature values with missing cells filled by the column mean
    pub imputed: Array2<f64>,
    /// Standardized copy of `imputed`
    pub standardized: Array2<f64>,
    /// Fitted imputer
    pub imputer: MeanImputer,
    /// Fitted scaler
    pub scaler: StandardScaler,
    /// Number of cells that were filled
    pub filled_cells: usize,
}

/// Extract the raw feature matrix of `batch`; missing cells are `NaN`
///
/// # Errors
/// Returns an error if a feature cell cannot be coerced to a number
pub fn extract_features(batch: &RecordBatch, layout: &DatasetLayout) -> Result<Array2<f64>> {
    let columns = layout
        .features
        .iter()
        .map(|(idx, name)| coerce_to_f64(batch.column(*idx), name))
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let n_rows = batch.num_rows();
    Ok(Array2::from_shape_fn((n_rows, columns.len()), |(i, j)| {
        columns[j][i]
    }))
}

/// Coerce, impute and standardize the feature columns of `batch`
///
/// Imputation and scaling statistics are fitted on all rows.
///
/// # Errors
/// Returns an error if the batch is empty, a cell is not numeric, or a
/// feature column has no present values
pub fn prepare_features(batch: &RecordBatch, layout: &DatasetLayout) -> Result<PreparedFeatures> {
    if batch.num_rows() == 0 {
        return Err(TrackHealthError::EmptyData(
            "dataset contains no rows".to_string(),
        ));
    }

    let feature_names = layout.feature_names();
    let mut imputed = extract_features(batch, layout)?;

    let imputer = MeanImputer::fit(&imputed, &feature_names)?;
    let filled_cells = imputer.transform_inplace(&mut imputed);
    if filled_cells > 0 {
        log::info!("Filled {filled_cells} missing feature values with column means");
    }

    let scaler = StandardScaler::fit(&imputed);
    let standardized = scaler.transform(&imputed);

    log::debug!(
        "Prepared {} x {} feature matrix",
        standardized.nrows(),
        standardized.ncols()
    );

    Ok(PreparedFeatures {
        feature_names,
        imputed,
        standardized,
        imputer,
        scaler,
        filled_cells,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::StringArray;
    use arrow::datatypes::{DataType, Field, Schema};

    use super::*;

    fn batch(rows: &[[Option<&str>; 4]]) -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("path", DataType::Utf8, true),
            Field::new("rms", DataType::Utf8, true),
            Field::new("peak", DataType::Utf8, true),
            Field::new("label", DataType::Utf8, true),
        ]));
        let columns = (0..4)
            .map(|c| {
                Arc::new(StringArray::from(
                    rows.iter().map(|r| r[c]).collect::<Vec<_>>(),
                )) as arrow::array::ArrayRef
            })
            .collect();
        RecordBatch::try_new(schema, columns).expect("batch")
    }

    #[test]
    fn missing_value_is_replaced_by_column_mean() {
        let batch = batch(&[
            [Some("t1"), Some("1.0"), Some("4.0"), Some("normal_like")],
            [Some("t2"), None, Some("5.0"), Some("normal_like")],
            [Some("t3"), Some("5.0"), Some("6.0"), Some("bearing_fault")],
        ]);
        let layout = DatasetLayout::resolve(&batch.schema(), "path", "label").expect("layout");

        let prepared = prepare_features(&batch, &layout).expect("prepared");
        assert_eq!(prepared.filled_cells, 1);
        assert_eq!(prepared.imputed[[1, 0]], 3.0);
        assert!(prepared.imputed.iter().all(|v| v.is_finite()));
        assert!(prepared.standardized.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn empty_batch_is_rejected() {
        let batch = batch(&[]);
        let layout = DatasetLayout::resolve(&batch.schema(), "path", "label").expect("layout");
        assert!(matches!(
            prepare_features(&batch, &layout),
            Err(TrackHealthError::EmptyData(_))
        ));
    }
}
