//! Dataset loading
//!
//! The track dataset is a single table with a header row. Delimited text is
//! the usual container; Parquet is accepted as well. Either way the result is
//! one Arrow `RecordBatch` holding every row of the file.

use std::io::{Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::csv::reader::{Format, ReaderBuilder};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::{Result, TrackHealthError, safe_open_file};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Default batch size used by the readers
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Number of records sampled when reading the header of a delimited file
const HEADER_SAMPLE_RECORDS: usize = 1;

/// Container format of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Delimited text with the given field separator
    Delimited(u8),
    /// Apache Parquet
    Parquet,
}

impl DatasetFormat {
    /// Pick the format from the file extension; unknown extensions are read as comma-separated text
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("parquet" | "pq") => Self::Parquet,
            Some("tsv" | "tab") => Self::Delimited(b'\t'),
            _ => Self::Delimited(b','),
        }
    }
}

/// Load the dataset at `path` into a single record batch
///
/// # Errors
/// Returns an error if the file cannot be opened or decoded
pub fn load_dataset(path: &Path) -> Result<RecordBatch> {
    let start = Instant::now();
    log_operation_start("Loading track dataset from", path);

    let batch = match DatasetFormat::from_path(path) {
        DatasetFormat::Delimited(delimiter) => read_delimited(path, delimiter),
        DatasetFormat::Parquet => read_parquet(path),
    }
    .map_err(|e| e.with_path(path))?;

    log_operation_complete("loaded", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Read a delimited text file with a header row
///
/// Every column is read as text. Numeric coercion happens during
/// preprocessing, where a failing cell can be reported with its column and
/// row.
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid delimited text
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<RecordBatch> {
    let mut file = safe_open_file(path, "track dataset")?;

    let format = Format::default()
        .with_header(true)
        .with_delimiter(delimiter);
    let (header, _) = format.infer_schema(&mut file, Some(HEADER_SAMPLE_RECORDS))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| TrackHealthError::io_error_with_source("Failed to rewind dataset", e))?;

    let schema = text_schema(&header);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Read a Parquet file, keeping the column types stored in the file
///
/// # Errors
/// Returns an error if the file cannot be opened or is not valid Parquet
pub fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = safe_open_file(path, "track dataset")?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

/// Same column names as `header`, every column nullable `Utf8`
fn text_schema(header: &Schema) -> SchemaRef {
    let fields: Vec<Field> = header
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}
