//! Random forest built from bootstrapped CART trees.

use indicatif::ProgressBar;
use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::config::ForestConfig;
use super::labels::LabelEncoder;
use super::sampling::{bootstrap_counts, sample_weights};
use super::tree::{DecisionTree, TreeParams, argmax};
use crate::error::{Result, TrackHealthError};

/// A fitted random forest classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    labels: LabelEncoder,
    n_features: usize,
}

impl RandomForest {
    /// Fit a forest on `x` against the string labels in `labels`
    ///
    /// Each tree gets its own seed, drawn in order from the master seed, so
    /// the fitted forest does not depend on whether trees are grown in
    /// parallel.
    ///
    /// # Errors
    /// Returns an error if the inputs are empty or their lengths disagree
    pub fn fit(
        x: ArrayView2<'_, f64>,
        labels: &[String],
        config: &ForestConfig,
        progress: Option<&ProgressBar>,
    ) -> Result<Self> {
        config.validate()?;
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(TrackHealthError::model_error(
                "cannot fit a forest on an empty feature matrix",
            ));
        }
        if x.nrows() != labels.len() {
            return Err(TrackHealthError::model_error(format!(
                "feature matrix has {} rows but {} labels were given",
                x.nrows(),
                labels.len()
            )));
        }

        let (encoder, y) = LabelEncoder::fit_encode(labels);
        let n_classes = encoder.n_classes();
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            min_samples_leaf: config.min_samples_leaf,
            max_features: config.max_features.resolve(x.ncols()),
        };

        let mut master = StdRng::seed_from_u64(config.seed);
        let seeds: Vec<u64> = (0..config.n_estimators).map(|_| master.random()).collect();

        log::debug!(
            "Fitting {} trees on {} samples, {} features, {} classes",
            config.n_estimators,
            x.nrows(),
            x.ncols(),
            n_classes
        );

        let grow = |seed: u64| {
            let tree = grow_tree(x, &y, n_classes, &params, config, seed);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            tree
        };

        let trees: Vec<DecisionTree> = if config.parallel {
            seeds.par_iter().map(|&seed| grow(seed)).collect()
        } else {
            seeds.iter().map(|&seed| grow(seed)).collect()
        };

        Ok(Self {
            trees,
            labels: encoder,
            n_features: x.ncols(),
        })
    }

    /// Mean of the trees' leaf class distributions, one row per sample
    ///
    /// # Errors
    /// Returns an error if `x` has a different number of features than the training data
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        self.check_features(x)?;

        let mut proba = Array2::<f64>::zeros((x.nrows(), self.labels.n_classes()));
        for (row, mut out) in x.axis_iter(Axis(0)).zip(proba.axis_iter_mut(Axis(0))) {
            for tree in &self.trees {
                for (o, p) in out.iter_mut().zip(tree.leaf_distribution(row)) {
                    *o += p;
                }
            }
        }

        proba /= self.trees.len() as f64;
        Ok(proba)
    }

    /// Predicted class label of every row of `x`
    ///
    /// # Errors
    /// Returns an error if `x` has a different number of features than the training data
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Vec<String>> {
        let proba = self.predict_proba(x)?;
        proba
            .axis_iter(Axis(0))
            .map(|row| {
                let class = argmax(&row.to_vec());
                self.labels
                    .decode(class)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        TrackHealthError::model_error(format!("class index {class} out of range"))
                    })
            })
            .collect()
    }

    /// Class labels known to the forest, sorted
    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.labels.classes()
    }

    /// The fitted trees
    #[must_use]
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }

    /// Number of features the forest was trained on
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    fn check_features(&self, x: ArrayView2<'_, f64>) -> Result<()> {
        if x.ncols() == self.n_features {
            Ok(())
        } else {
            Err(TrackHealthError::model_error(format!(
                "expected {} features, got {}",
                self.n_features,
                x.ncols()
            )))
        }
    }
}

fn grow_tree(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    n_classes: usize,
    params: &TreeParams,
    config: &ForestConfig,
    seed: u64,
) -> DecisionTree {
    let mut rng = StdRng::seed_from_u64(seed);

    let multiplicity: Vec<f64> = if config.bootstrap {
        bootstrap_counts(y.len(), &mut rng)
            .into_iter()
            .map(f64::from)
            .collect()
    } else {
        vec![1.0; y.len()]
    };
    let weights = sample_weights(y, &multiplicity, n_classes, config.class_weight);

    DecisionTree::fit(x, y, &weights, n_classes, params, &mut rng)
}
