//! Emergency alert export as delimited text.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Int64Array, StringArray, UInt32Array};
use arrow::compute::take_record_batch;
use arrow::csv::WriterBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use super::maintenance::MaintenanceLog;
use crate::error::{Result, TrackHealthError, TrackResultExt};
use crate::models::track::{ScoredTable, TrackRecord};
use crate::schema::{MAINTENANCE_DONE_COLUMN, PATH_TIME_COLUMN, SEVERITY_COLUMN};
use crate::utils::time::format_path_time;

/// Rows of the scored table for `records`, in that order, with the
/// `Maintenance_Done`, `Severity` and `path_time` columns appended
///
/// # Errors
/// Returns an error if a record's row is outside the table
pub fn export_batch(
    table: &ScoredTable,
    records: &[&TrackRecord],
    log: &MaintenanceLog,
) -> Result<RecordBatch> {
    let indices = records
        .iter()
        .map(|r| {
            u32::try_from(r.row)
                .ok()
                .filter(|_| r.row < table.len())
                .ok_or_else(|| {
                    TrackHealthError::model_error(format!("row {} is outside the table", r.row))
                })
        })
        .collect::<Result<Vec<u32>>>()?;

    let selected = take_record_batch(table.batch(), &UInt32Array::from(indices))
        .with_track_context(|| "Failed to select emergency rows".to_string())?;

    let schema = selected.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    fields.push(Field::new(MAINTENANCE_DONE_COLUMN, DataType::Boolean, false));
    fields.push(Field::new(SEVERITY_COLUMN, DataType::Int64, false));
    fields.push(Field::new(PATH_TIME_COLUMN, DataType::Utf8, true));

    let mut columns: Vec<ArrayRef> = selected.columns().to_vec();
    columns.push(Arc::new(BooleanArray::from(
        records.iter().map(|r| log.is_done(r.row)).collect::<Vec<_>>(),
    )));
    columns.push(Arc::new(Int64Array::from_iter_values(
        records.iter().map(|r| i64::from(r.severity())),
    )));
    columns.push(Arc::new(StringArray::from(
        records
            .iter()
            .map(|r| r.path_time.as_ref().map(format_path_time))
            .collect::<Vec<_>>(),
    )));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .with_track_context(|| "Failed to assemble emergency export".to_string())
}

/// Render a batch as UTF-8 CSV with a header row
///
/// # Errors
/// Returns an error if the CSV writer fails
pub fn to_csv_bytes(batch: &RecordBatch) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new().with_header(true).build(&mut buffer);
        writer.write(batch)?;
    }
    Ok(buffer)
}

/// Write a batch as CSV to `path`
///
/// # Errors
/// Returns an error if the file cannot be created or written
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        TrackHealthError::io_error_with_source("Failed to create export file", e).with_path(path)
    })?;
    let mut writer = WriterBuilder::new()
        .with_header(true)
        .build(BufWriter::new(file));
    writer.write(batch).map_err(|e| TrackHealthError::from(e).with_path(path))?;
    writer.into_inner().flush().map_err(|e| {
        TrackHealthError::io_error_with_source("Failed to flush export file", e).with_path(path)
    })?;

    log::info!("Wrote {} rows to {}", batch.num_rows(), path.display());
    Ok(())
}
