//! In-memory record of completed maintenance.

use std::collections::BTreeSet;

use serde::Serialize;

/// Set of row indices whose maintenance has been marked done
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaintenanceLog {
    done: BTreeSet<usize>,
}

impl MaintenanceLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `row` as maintained; returns `false` if it already was
    pub fn acknowledge(&mut self, row: usize) -> bool {
        self.done.insert(row)
    }

    #[must_use]
    pub fn is_done(&self, row: usize) -> bool {
        self.done.contains(&row)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.done.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    /// Acknowledged rows in ascending order
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.done.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledging_twice_is_a_no_op() {
        let mut log = MaintenanceLog::new();
        assert!(log.acknowledge(7));
        assert!(!log.acknowledge(7));
        assert!(log.acknowledge(2));
        assert_eq!(log.rows().collect::<Vec<_>>(), vec![2, 7]);
        assert!(log.is_done(7) && !log.is_done(3));
    }
}
