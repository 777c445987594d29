//! Bootstrap sampling and class weighting for individual trees.

use rand::Rng;

use super::config::ClassWeight;

/// Draw `n` indices with replacement and return how often each index was drawn
pub fn bootstrap_counts<R: Rng>(n: usize, rng: &mut R) -> Vec<u32> {
    let mut counts = vec![0_u32; n];
    for _ in 0..n {
        counts[rng.random_range(0..n)] += 1;
    }
    counts
}

/// Per-class weights `total / (n_present_classes * class_total)`
///
/// `multiplicity` gives how many times each sample is counted. Classes absent
/// from the counted samples get weight 0.
#[must_use]
pub fn balanced_class_weights(y: &[usize], multiplicity: &[f64], n_classes: usize) -> Vec<f64> {
    let mut class_totals = vec![0.0_f64; n_classes];
    for (&class, &m) in y.iter().zip(multiplicity) {
        class_totals[class] += m;
    }

    let total: f64 = class_totals.iter().sum();
    let present = class_totals.iter().filter(|&&c| c > 0.0).count() as f64;

    class_totals
        .iter()
        .map(|&c| if c > 0.0 { total / (present * c) } else { 0.0 })
        .collect()
}

/// Final sample weights for one tree: multiplicity times class weight
#[must_use]
pub fn sample_weights(
    y: &[usize],
    multiplicity: &[f64],
    n_classes: usize,
    mode: ClassWeight,
) -> Vec<f64> {
    let class_weights = match mode {
        ClassWeight::None => vec![1.0; n_classes],
        ClassWeight::Balanced => balanced_class_weights(y, &vec![1.0; y.len()], n_classes),
        ClassWeight::BalancedSubsample => balanced_class_weights(y, multiplicity, n_classes),
    };

    y.iter()
        .zip(multiplicity)
        .map(|(&class, &m)| m * class_weights[class])
        .collect()
}
