//! Console rendering of the dashboard.

use std::fmt;

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::dashboard::{Dashboard, DetailView, condition_definitions};
use crate::error::Result;

/// Rows of the detailed table printed by default
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Plain-text view of a dashboard
#[derive(Debug, Clone, Copy)]
pub struct DashboardReport<'a>(pub &'a Dashboard);

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0.summary();

        writeln!(f, "Railway Track Health Monitoring Dashboard")?;
        writeln!(f, "=========================================")?;
        writeln!(f, "Good Tracks: {}", summary.counts.good)?;
        writeln!(f, "OK Tracks:   {}", summary.counts.ok)?;
        writeln!(f, "{}", summary.banner.headline)?;
        writeln!(f, "  {}", summary.banner.caption)?;

        writeln!(f, "\nTrack Condition Percentage")?;
        for slice in &summary.chart {
            writeln!(
                f,
                "  {:<7} {:>6} {:>6.1}%  ({})",
                slice.condition.as_str(),
                slice.count,
                slice.percentage,
                slice.color
            )?;
        }

        let emergencies = self.0.emergencies();
        writeln!(f, "\nEmergency Alerts")?;
        if emergencies.is_empty() {
            writeln!(f, "  No dangerous conditions detected")?;
        } else {
            writeln!(f, "  {} Dangerous Track Segments", emergencies.len())?;
            for record in &emergencies {
                writeln!(
                    f,
                    "  - {}: {}",
                    DetailView::list_label(record),
                    record.predicted_label
                )?;
            }
        }

        writeln!(f, "\nTrack Condition Definitions")?;
        for definition in condition_definitions() {
            writeln!(f, "  {}", definition.title)?;
            for point in definition.points {
                writeln!(f, "    - {point}")?;
            }
        }
        Ok(())
    }
}

/// Render the dashboard as plain text
#[must_use]
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    DashboardReport(dashboard).to_string()
}

/// Render the details of a selected emergency
#[must_use]
pub fn render_detail(view: &DetailView) -> String {
    format!(
        "Time: {}\nCondition: {}\nPredicted Fault: {}\nMaintenance Done: {}\n",
        view.time, view.condition, view.predicted_fault, view.maintenance_done
    )
}

/// Pretty-printed table of the first `max_rows` rows of a batch
///
/// # Errors
/// Returns an error if the batch cannot be formatted
pub fn render_table(batch: &RecordBatch, max_rows: usize) -> Result<String> {
    let preview = batch.slice(0, max_rows.min(batch.num_rows()));
    Ok(pretty_format_batches(&[preview])?.to_string())
}

/// Print the dashboard followed by a preview of the detailed table
///
/// # Errors
/// Returns an error if the table cannot be formatted
pub fn print_dashboard(dashboard: &Dashboard, preview_rows: usize) -> Result<()> {
    println!("{}", render_dashboard(dashboard));
    let selected = dashboard
        .emergencies()
        .first()
        .and_then(|record| dashboard.select(record.row));
    if let Some(view) = selected {
        println!("Selected Emergency Details\n{}", render_detail(&view));
    }
    println!(
        "Detailed Track Analysis ({} of {} rows)",
        preview_rows.min(dashboard.table().len()),
        dashboard.table().len()
    );
    println!("{}", render_table(dashboard.table().batch(), preview_rows)?);
    Ok(())
}
