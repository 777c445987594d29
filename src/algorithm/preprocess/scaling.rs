//! Standardization of feature columns to zero mean and unit variance.

use ndarray::{Array1, Array2, Axis};

/// Column scales below this are treated as constant columns
const MIN_SCALE: f64 = 10.0 * f64::EPSILON;

/// Per-column standardization fitted on the whole input
///
/// Uses the population standard deviation. Constant columns are only
/// centered.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations
    ///
    /// `x` must not contain missing values and must have at least one row.
    #[must_use]
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let mean = x.sum_axis(Axis(0)) / n;

        let scale = x
            .axis_iter(Axis(1))
            .zip(mean.iter())
            .map(|(column, m)| {
                let variance = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
                let std = variance.sqrt();
                if std < MIN_SCALE { 1.0 } else { std }
            })
            .collect::<Array1<f64>>();

        Self { mean, scale }
    }

    /// Standardize `x` with the fitted statistics
    #[must_use]
    pub fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.scale
    }

    /// Fitted column means
    #[must_use]
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Fitted column scales
    #[must_use]
    pub fn scale(&self) -> &Array1<f64> {
        &self.scale
    }
}
