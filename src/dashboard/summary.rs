//! Headline metrics and chart data.

use serde::Serialize;

use crate::algorithm::condition::Condition;
use crate::models::track::TrackRecord;

/// Number of records per condition
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConditionCounts {
    pub good: usize,
    pub ok: usize,
    pub danger: usize,
}

impl ConditionCounts {
    #[must_use]
    pub fn from_records(records: &[TrackRecord]) -> Self {
        records.iter().fold(Self::default(), |mut counts, record| {
            match record.condition {
                Condition::Good => counts.good += 1,
                Condition::Ok => counts.ok += 1,
                Condition::Danger => counts.danger += 1,
            }
            counts
        })
    }

    #[must_use]
    pub const fn get(&self, condition: Condition) -> usize {
        match condition {
            Condition::Good => self.good,
            Condition::Ok => self.ok,
            Condition::Danger => self.danger,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.good + self.ok + self.danger
    }
}

/// The danger metric shown next to the Good/OK counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DangerBanner {
    pub dangerous: usize,
    pub headline: String,
    pub caption: String,
}

impl DangerBanner {
    #[must_use]
    pub fn from_counts(counts: &ConditionCounts) -> Self {
        let caption = if counts.danger > 0 {
            "Immediate inspection required"
        } else {
            "All track segments are safe"
        };
        Self {
            dangerous: counts.danger,
            headline: format!("Dangerous Tracks: {}", counts.danger),
            caption: caption.to_string(),
        }
    }

    /// Whether the banner is an alert rather than an all-clear
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        self.dangerous > 0
    }
}

/// One condition's share of the table, for pie and bar charts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub condition: Condition,
    pub count: usize,
    /// Share of all rows, 0 to 100
    pub percentage: f64,
    pub color: &'static str,
}

/// Chart data in Good, OK, Danger order; percentages are 0 for an empty table
#[must_use]
pub fn chart_data(counts: &ConditionCounts) -> Vec<ChartSlice> {
    let total = counts.total();
    Condition::ALL
        .into_iter()
        .map(|condition| {
            let count = counts.get(condition);
            let percentage = if total == 0 {
                0.0
            } else {
                100.0 * count as f64 / total as f64
            };
            ChartSlice {
                condition,
                count,
                percentage,
                color: condition.color(),
            }
        })
        .collect()
}

/// Everything shown above the emergency panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub counts: ConditionCounts,
    pub banner: DangerBanner,
    pub chart: Vec<ChartSlice>,
}

impl DashboardSummary {
    #[must_use]
    pub fn from_records(records: &[TrackRecord]) -> Self {
        let counts = ConditionCounts::from_records(records);
        Self {
            banner: DangerBanner::from_counts(&counts),
            chart: chart_data(&counts),
            counts,
        }
    }
}
