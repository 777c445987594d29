//! Mean imputation of missing feature values.

use ndarray::{Array1, Array2, Axis};

use crate::error::{Result, TrackHealthError};

/// Replaces missing (`NaN`) cells with the mean of the column's present values
#[derive(Debug, Clone, PartialEq)]
pub struct MeanImputer {
    means: Array1<f64>,
}

impl MeanImputer {
    /// Compute per-column means over the non-missing cells
    ///
    /// # Errors
    /// Returns `EmptyData` if a column has no present value, naming the column
    pub fn fit(x: &Array2<f64>, feature_names: &[String]) -> Result<Self> {
        let means = x
            .axis_iter(Axis(1))
            .enumerate()
            .map(|(j, column)| {
                let (sum, count) = column
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0_f64, 0_usize), |(s, c), v| (s + v, c + 1));

                if count == 0 {
                    let name = feature_names.get(j).map_or("?", String::as_str);
                    Err(TrackHealthError::EmptyData(format!(
                        "feature column '{name}' has no values to compute a mean from"
                    )))
                } else {
                    Ok(sum / count as f64)
                }
            })
            .collect::<Result<Vec<f64>>>()?;

        Ok(Self {
            means: Array1::from(means),
        })
    }

    /// Fill missing cells in place; returns the number of cells filled
    pub fn transform_inplace(&self, x: &mut Array2<f64>) -> usize {
        let mut filled = 0;
        for (mut column, mean) in x.axis_iter_mut(Axis(1)).zip(self.means.iter()) {
            for value in column.iter_mut().filter(|v| v.is_nan()) {
                *value = *mean;
                filled += 1;
            }
        }
        filled
    }

    /// Column means used for filling
    #[must_use]
    pub fn means(&self) -> &Array1<f64> {
        &self.means
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn missing_cells_take_mean_of_present_values() {
        let mut x = array![[1.0, 10.0], [f64::NAN, 20.0], [3.0, f64::NAN]];
        let imputer = MeanImputer::fit(&x, &names(2)).expect("fit");

        assert_eq!(imputer.means(), &array![2.0, 15.0]);
        assert_eq!(imputer.transform_inplace(&mut x), 2);
        assert_eq!(x, array![[1.0, 10.0], [2.0, 20.0], [3.0, 15.0]]);
    }

    #[test]
    fn all_missing_column_is_an_error() {
        let x = array![[1.0, f64::NAN], [2.0, f64::NAN]];
        let err = MeanImputer::fit(&x, &names(2)).expect_err("no mean");
        assert!(err.to_string().contains("f1"));
    }
}
