//! CART decision tree with weighted Gini impurity.
//!
//! Nodes live in a flat vector; node 0 is the root. Growth uses an explicit
//! work stack, so unlimited depth does not recurse.

use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;
use rand::seq::SliceRandom;

/// Growth limits of a single tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth; `None` means unlimited
    pub max_depth: Option<usize>,
    /// Minimum samples for a node to be split
    pub min_samples_split: usize,
    /// Minimum samples in each child
    pub min_samples_leaf: usize,
    /// Non-constant features examined per split
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        /// Normalized class weight distribution
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

/// A fitted classification tree
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_classes: usize,
}

impl DecisionTree {
    /// Grow a tree on the samples with positive weight
    ///
    /// # Arguments
    /// * `x` - Feature matrix, one row per sample
    /// * `y` - Class index of every sample
    /// * `weights` - Sample weights; samples with weight 0 are ignored
    /// * `n_classes` - Number of classes
    /// * `params` - Growth limits
    /// * `rng` - Source of randomness for feature sampling
    pub fn fit<R: Rng>(
        x: ArrayView2<'_, f64>,
        y: &[usize],
        weights: &[f64],
        n_classes: usize,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let samples: Vec<usize> = (0..y.len()).filter(|&i| weights[i] > 0.0).collect();
        let mut features: Vec<usize> = (0..x.ncols()).collect();

        let mut nodes = vec![Node::Leaf {
            distribution: Vec::new(),
        }];
        let mut stack = vec![(0_usize, samples, 0_usize)];

        while let Some((node_id, samples, depth)) = stack.pop() {
            let totals = class_totals(y, weights, &samples, n_classes);
            let total_weight: f64 = totals.iter().sum();

            let splittable = samples.len() >= params.min_samples_split
                && samples.len() >= 2 * params.min_samples_leaf
                && params.max_depth.is_none_or(|max| depth < max)
                && gini(&totals, total_weight) > 0.0;

            let split = if splittable {
                best_split(x, y, weights, &samples, &totals, params, &mut features, rng)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let (left, right): (Vec<usize>, Vec<usize>) = samples
                        .into_iter()
                        .partition(|&i| x[[i, split.feature]] <= split.threshold);

                    let left_id = nodes.len();
                    let right_id = left_id + 1;
                    nodes.push(Node::Leaf {
                        distribution: Vec::new(),
                    });
                    nodes.push(Node::Leaf {
                        distribution: Vec::new(),
                    });
                    nodes[node_id] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left: left_id,
                        right: right_id,
                    };

                    stack.push((right_id, right, depth + 1));
                    stack.push((left_id, left, depth + 1));
                }
                None => {
                    nodes[node_id] = Node::Leaf {
                        distribution: normalize(totals, total_weight),
                    };
                }
            }
        }

        Self { nodes, n_classes }
    }

    /// Class distribution of the leaf that `row` falls into
    #[must_use]
    pub fn leaf_distribution(&self, row: ArrayView1<'_, f64>) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Most probable class for `row`
    #[must_use]
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> usize {
        argmax(self.leaf_distribution(row))
    }

    /// Number of classes the tree was fitted with
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Total number of nodes
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a single leaf has depth 0)
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0_usize, 0_usize)];
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[id] {
                stack.push((*left, depth + 1));
                stack.push((*right, depth + 1));
            }
        }
        max_depth
    }
}

/// Index of the largest value; ties go to the lowest index
#[must_use]
pub fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_v), (i, &v)| {
            if v > best_v { (i, v) } else { (best, best_v) }
        })
        .0
}

fn class_totals(y: &[usize], weights: &[f64], samples: &[usize], n_classes: usize) -> Vec<f64> {
    let mut totals = vec![0.0; n_classes];
    for &i in samples {
        totals[y[i]] += weights[i];
    }
    totals
}

fn gini(totals: &[f64], total_weight: f64) -> f64 {
    if total_weight <= 0.0 {
        return 0.0;
    }
    1.0 - totals
        .iter()
        .map(|c| (c / total_weight).powi(2))
        .sum::<f64>()
}

fn normalize(totals: Vec<f64>, total_weight: f64) -> Vec<f64> {
    if total_weight <= 0.0 {
        return totals;
    }
    totals.into_iter().map(|c| c / total_weight).collect()
}

/// Search the shuffled features for the split with the lowest weighted child impurity
///
/// Features that are constant within the node do not count towards
/// `max_features`. When no valid split is found among the first
/// `max_features` candidates the search continues over the rest.
#[allow(clippy::too_many_arguments)]
fn best_split<R: Rng>(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    weights: &[f64],
    samples: &[usize],
    totals: &[f64],
    params: &TreeParams,
    features: &mut [usize],
    rng: &mut R,
) -> Option<Split> {
    features.shuffle(rng);

    let mut sorted = samples.to_vec();
    let mut best: Option<Split> = None;
    let mut visited = 0;

    for &feature in features.iter() {
        if visited >= params.max_features && best.is_some() {
            break;
        }

        sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
        let first = x[[sorted[0], feature]];
        let last = x[[sorted[sorted.len() - 1], feature]];
        if first >= last {
            continue;
        }
        visited += 1;

        if let Some(candidate) = best_threshold(x, y, weights, &sorted, totals, feature, params)
        {
            if best.is_none_or(|b| candidate.impurity < b.impurity) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// Best threshold on one feature, given samples sorted by that feature
fn best_threshold(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    weights: &[f64],
    sorted: &[usize],
    totals: &[f64],
    feature: usize,
    params: &TreeParams,
) -> Option<Split> {
    let total_weight: f64 = totals.iter().sum();
    let mut left = vec![0.0; totals.len()];
    let mut left_weight = 0.0;
    let mut best: Option<Split> = None;

    for pos in 0..sorted.len() - 1 {
        let i = sorted[pos];
        left[y[i]] += weights[i];
        left_weight += weights[i];

        let value = x[[i, feature]];
        let next = x[[sorted[pos + 1], feature]];
        if value >= next {
            continue;
        }

        let n_left = pos + 1;
        let n_right = sorted.len() - n_left;
        if n_left < params.min_samples_leaf || n_right < params.min_samples_leaf {
            continue;
        }

        let right_weight = total_weight - left_weight;
        let right_sq: f64 = totals
            .iter()
            .zip(&left)
            .map(|(t, l)| (t - l).powi(2))
            .sum();
        let left_sq: f64 = left.iter().map(|l| l.powi(2)).sum();

        let left_gini = if left_weight > 0.0 {
            1.0 - left_sq / (left_weight * left_weight)
        } else {
            0.0
        };
        let right_gini = if right_weight > 0.0 {
            1.0 - right_sq / (right_weight * right_weight)
        } else {
            0.0
        };
        let impurity = (left_weight * left_gini + right_weight * right_gini) / total_weight;

        if best.is_none_or(|b| impurity < b.impurity) {
            best = Some(Split {
                feature,
                threshold: midpoint(value, next),
                impurity,
            });
        }
    }

    best
}

/// Threshold between two consecutive distinct values, always `>= low` and `< high`
fn midpoint(low: f64, high: f64) -> f64 {
    let mid = low / 2.0 + high / 2.0;
    if mid >= high || !mid.is_finite() {
        low
    } else {
        mid
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array2, array};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn params(max_features: usize) -> TreeParams {
        TreeParams {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features,
        }
    }

    #[test]
    fn separable_training_data_is_fitted_exactly() {
        let x = array![[0.0, 5.0], [1.0, 4.0], [2.0, 3.0], [3.0, 2.0], [4.0, 1.0], [5.0, 0.0]];
        let y = [0, 0, 1, 1, 2, 2];
        let tree = DecisionTree::fit(
            x.view(),
            &y,
            &[1.0; 6],
            3,
            &params(1),
            &mut StdRng::seed_from_u64(0),
        );

        for (i, &class) in y.iter().enumerate() {
            assert_eq!(tree.predict_row(x.row(i)), class);
        }
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.n_nodes(), 5);
    }

    #[test]
    fn zero_weight_samples_are_ignored() {
        let x = array![[0.0], [1.0], [2.0]];
        let y = [0, 1, 1];
        let tree = DecisionTree::fit(
            x.view(),
            &y,
            &[0.0, 1.0, 2.0],
            2,
            &params(1),
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.leaf_distribution(x.row(0)), &[0.0, 1.0]);
    }

    #[test]
    fn constant_features_give_a_single_leaf() {
        let x = Array2::from_elem((4, 2), 1.0);
        let y = [0, 1, 0, 1];
        let tree = DecisionTree::fit(
            x.view(),
            &y,
            &[1.0; 4],
            2,
            &params(2),
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.leaf_distribution(x.row(0)), &[0.5, 0.5]);
        assert_eq!(tree.predict_row(x.row(0)), 0);
    }

    #[test]
    fn max_depth_limits_growth() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let y = [0, 1, 0, 1];
        let tree = DecisionTree::fit(
            x.view(),
            &y,
            &[1.0; 4],
            2,
            &TreeParams {
                max_depth: Some(1),
                ..params(1)
            },
            &mut StdRng::seed_from_u64(0),
        );

        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn midpoint_stays_below_upper_value() {
        assert_eq!(midpoint(1.0, 3.0), 2.0);
        let next = f64::from_bits(1.0_f64.to_bits() + 1);
        assert_eq!(midpoint(1.0, next), 1.0);
    }

    #[test]
    fn argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.25, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[0.0, 0.0]), 0);
    }
}
