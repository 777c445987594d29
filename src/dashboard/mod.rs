//! Dashboard data model
//!
//! Holds the scored table together with the maintenance log and exposes
//! what an operator sees: the headline metrics and chart data, the
//! emergency list, the detail view of a selected emergency, and the CSV
//! export of open alerts.

pub mod definitions;
pub mod emergency;
pub mod export;
pub mod maintenance;
pub mod summary;

use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::algorithm::condition::Condition;
use crate::error::{Result, TrackHealthError};
use crate::models::track::{ScoredTable, TrackRecord};

pub use definitions::{ConditionDefinition, condition_definitions, definition_of};
pub use emergency::{DetailView, emergency_rows, urgency_order};
pub use export::{export_batch, to_csv_bytes, write_csv};
pub use maintenance::MaintenanceLog;
pub use summary::{ChartSlice, ConditionCounts, DangerBanner, DashboardSummary, chart_data};

/// A scored table plus the operator's maintenance acknowledgements
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: ScoredTable,
    summary: DashboardSummary,
    maintenance: MaintenanceLog,
}

impl Dashboard {
    #[must_use]
    pub fn new(table: ScoredTable) -> Self {
        let summary = DashboardSummary::from_records(table.records());
        Self {
            table,
            summary,
            maintenance: MaintenanceLog::new(),
        }
    }

    /// The full scored table, for the detailed analysis view
    #[must_use]
    pub fn table(&self) -> &ScoredTable {
        &self.table
    }

    /// Counts, banner and chart data; unaffected by acknowledgements
    #[must_use]
    pub fn summary(&self) -> &DashboardSummary {
        &self.summary
    }

    #[must_use]
    pub fn maintenance(&self) -> &MaintenanceLog {
        &self.maintenance
    }

    /// Open emergencies, most urgent first
    #[must_use]
    pub fn emergencies(&self) -> Vec<&TrackRecord> {
        emergency_rows(self.table.records(), &self.maintenance)
    }

    /// Mark maintenance on a dangerous row as done
    ///
    /// Returns `false` if the row was already acknowledged.
    ///
    /// # Errors
    /// Returns `NotAnEmergency` if the row does not exist or is not `Danger`
    pub fn acknowledge(&mut self, row: usize) -> Result<bool> {
        match self.table.record(row) {
            Some(record) if record.condition == Condition::Danger => {
                let newly_done = self.maintenance.acknowledge(row);
                if newly_done {
                    log::info!("Maintenance marked as completed for row {row}");
                }
                Ok(newly_done)
            }
            _ => Err(TrackHealthError::NotAnEmergency(row)),
        }
    }

    /// Detail view of a dangerous row, acknowledged or not
    #[must_use]
    pub fn select(&self, row: usize) -> Option<DetailView> {
        self.table
            .record(row)
            .filter(|r| r.condition == Condition::Danger)
            .map(|r| DetailView::new(r, &self.maintenance))
    }

    /// Open emergencies as a table with the export columns appended
    ///
    /// # Errors
    /// Returns an error if the export table cannot be assembled
    pub fn emergency_export(&self) -> Result<RecordBatch> {
        export_batch(&self.table, &self.emergencies(), &self.maintenance)
    }

    /// Open emergencies as CSV bytes
    ///
    /// # Errors
    /// Returns an error if the export table cannot be assembled or written
    pub fn emergency_csv(&self) -> Result<Vec<u8>> {
        to_csv_bytes(&self.emergency_export()?)
    }

    /// Write open emergencies to `path`; returns the number of rows written
    ///
    /// # Errors
    /// Returns an error if the export cannot be assembled or the file written
    pub fn write_emergency_csv(&self, path: &Path) -> Result<usize> {
        let batch = self.emergency_export()?;
        write_csv(&batch, path)?;
        Ok(batch.num_rows())
    }
}
