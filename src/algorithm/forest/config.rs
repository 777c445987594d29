//! Random forest hyperparameters

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackHealthError};

/// How per-sample weights compensate for label imbalance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassWeight {
    /// All samples weigh the same
    None,
    /// Weights from class frequencies over the whole training set
    Balanced,
    /// Weights from class frequencies in each tree's bootstrap sample
    BalancedSubsample,
}

/// Number of features considered when searching for a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxFeatures {
    /// `floor(sqrt(n_features))`
    Sqrt,
    /// `floor(log2(n_features))`
    Log2,
    /// Every feature
    All,
    /// A fixed count, capped at the number of features
    Fixed(usize),
}

impl MaxFeatures {
    /// Resolve to a concrete feature count for `n_features` columns (at least 1)
    #[must_use]
    pub fn resolve(self, n_features: usize) -> usize {
        let n = n_features as f64;
        let k = match self {
            Self::Sqrt => n.sqrt().floor() as usize,
            Self::Log2 => n.log2().floor() as usize,
            Self::All => n_features,
            Self::Fixed(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Configuration of the random forest classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Seed of the master random generator
    pub seed: u64,
    /// Class weighting scheme
    pub class_weight: ClassWeight,
    /// Maximum tree depth; `None` grows trees until leaves are pure
    pub max_depth: Option<usize>,
    /// Minimum number of samples a node needs to be split
    pub min_samples_split: usize,
    /// Minimum number of samples in each child of a split
    pub min_samples_leaf: usize,
    /// Features considered per split
    pub max_features: MaxFeatures,
    /// Draw a bootstrap sample for each tree
    pub bootstrap: bool,
    /// Fit trees on the rayon thread pool
    pub parallel: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            seed: 42,
            class_weight: ClassWeight::BalancedSubsample,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            parallel: false,
        }
    }
}

impl ForestConfig {
    /// Check the hyperparameters
    ///
    /// # Errors
    /// Returns a configuration error for values that cannot produce a forest
    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(TrackHealthError::Config(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(TrackHealthError::Config(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrackHealthError::Config(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(TrackHealthError::Config(
                "max_depth must be at least 1 when set".to_string(),
            ));
        }
        if self.max_features == MaxFeatures::Fixed(0) {
            return Err(TrackHealthError::Config(
                "max_features must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for ForestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forest Configuration:")?;
        writeln!(f, "  Estimators: {}", self.n_estimators)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Class Weight: {:?}", self.class_weight)?;
        if let Some(depth) = self.max_depth {
            writeln!(f, "  Max Depth: {depth}")?;
        }
        writeln!(f, "  Max Features: {:?}", self.max_features)?;
        writeln!(f, "  Bootstrap: {}", self.bootstrap)?;
        writeln!(f, "  Parallel: {}", self.parallel)
    }
}
