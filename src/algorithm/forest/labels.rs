//! Encoding of label strings as class indices.

use itertools::Itertools;
use rustc_hash::FxHashMap;

/// Sorted set of class labels with their indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl LabelEncoder {
    /// Build the encoder from `labels` and encode them
    ///
    /// Classes are sorted lexicographically, so class 0 is the smallest label.
    #[must_use]
    pub fn fit_encode(labels: &[String]) -> (Self, Vec<usize>) {
        let classes: Vec<String> = labels.iter().sorted().dedup().cloned().collect();
        let index: FxHashMap<String, usize> = classes
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        let encoded = labels.iter().map(|l| index[l]).collect();
        (Self { classes, index }, encoded)
    }

    /// Number of distinct classes
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Class labels in index order
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Label of a class index
    #[must_use]
    pub fn decode(&self, class: usize) -> Option<&str> {
        self.classes.get(class).map(String::as_str)
    }

    /// Class index of a label, if it was seen during fitting
    #[must_use]
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_sorted_and_encoded() {
        let labels: Vec<String> = ["normal_like", "bearing_fault", "normal_like"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let (encoder, encoded) = LabelEncoder::fit_encode(&labels);

        assert_eq!(encoder.classes(), ["bearing_fault", "normal_like"]);
        assert_eq!(encoded, vec![1, 0, 1]);
        assert_eq!(encoder.decode(0), Some("bearing_fault"));
        assert_eq!(encoder.encode("unseen"), None);
    }
}
