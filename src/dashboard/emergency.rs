//! Emergency list and the detail view of a selected emergency.

use std::cmp::Ordering;

use serde::Serialize;

use super::maintenance::MaintenanceLog;
use crate::algorithm::condition::Condition;
use crate::models::track::TrackRecord;

/// Dangerous rows not yet maintained, most urgent first
///
/// Sorted by severity descending, then by path time descending with unknown
/// times last. The sort is stable, so ties keep dataset order.
#[must_use]
pub fn emergency_rows<'a>(records: &'a [TrackRecord], log: &MaintenanceLog) -> Vec<&'a TrackRecord> {
    let mut rows: Vec<&TrackRecord> = records
        .iter()
        .filter(|r| r.condition == Condition::Danger && !log.is_done(r.row))
        .collect();
    rows.sort_by(|a, b| urgency_order(a, b));
    rows
}

/// Ordering that puts the more urgent record first
#[must_use]
pub fn urgency_order(a: &TrackRecord, b: &TrackRecord) -> Ordering {
    b.severity()
        .cmp(&a.severity())
        .then_with(|| match (&a.path_time, &b.path_time) {
            (Some(ta), Some(tb)) => tb.cmp(ta),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
}

/// Details shown for a selected emergency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    pub row: usize,
    pub time: String,
    pub condition: Condition,
    pub predicted_fault: String,
    pub maintenance_done: bool,
}

impl DetailView {
    #[must_use]
    pub fn new(record: &TrackRecord, log: &MaintenanceLog) -> Self {
        Self {
            row: record.row,
            time: record.display_time(),
            condition: record.condition,
            predicted_fault: record.predicted_label.clone(),
            maintenance_done: log.is_done(record.row),
        }
    }

    /// Entry text in the emergency selection list
    #[must_use]
    pub fn list_label(record: &TrackRecord) -> String {
        format!("{} (row {})", record.display_time(), record.row)
    }
}
