//! End-to-end scoring: load, preprocess, fit, predict, map.

use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use ndarray::Axis;

use super::condition::{Condition, map_condition};
use super::forest::RandomForest;
use super::preprocess::{MeanImputer, PreparedFeatures, StandardScaler, prepare_features};
use crate::config::PipelineConfig;
use crate::error::{Result, TrackHealthError, TrackResultExt};
use crate::loader::load_dataset;
use crate::models::track::{ScoredTable, TrackRecord};
use crate::schema::{DatasetLayout, scored_schema};
use crate::utils::arrow::string_values;
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar, log_warning};
use crate::utils::time::parse_path_time;

/// Everything fitted during a run; lives only as long as the caller keeps it
#[derive(Debug, Clone)]
pub struct TrainedModel {
    /// Column means used to fill missing feature cells
    pub imputer: MeanImputer,
    /// Centering and scaling fitted on the imputed features
    pub scaler: StandardScaler,
    /// Forest fitted on the standardized features
    pub forest: RandomForest,
}

/// Result of scoring a dataset
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Scored rows
    pub table: ScoredTable,
    /// Model the rows were scored with
    pub model: TrainedModel,
}

/// Load the configured dataset and score every row
///
/// # Errors
/// Returns an error if the configuration is invalid, the dataset cannot be
/// read, or any step of preprocessing or fitting fails
pub fn train_and_predict(config: &PipelineConfig) -> Result<ScoredTable> {
    run_pipeline(config).map(|output| output.table)
}

/// Like [`train_and_predict`] but also returns the fitted model
///
/// # Errors
/// See [`train_and_predict`]
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;
    let batch = load_dataset(&config.dataset_path)?;
    score_batch(&batch, config)
        .map_err(|e| e.with_path(&config.dataset_path))
}

/// Score an already loaded dataset
///
/// # Errors
/// Returns an error if required columns are missing, a label is missing,
/// a feature cell is not numeric, or fitting fails
pub fn score_batch(batch: &RecordBatch, config: &PipelineConfig) -> Result<PipelineOutput> {
    let start = Instant::now();
    let layout = DatasetLayout::resolve(&batch.schema(), &config.path_column, &config.label_column)?;
    let features = prepare_features(batch, &layout)?;

    let labels = required_labels(batch, &config.label_column)?;
    let paths = string_values(batch, &config.path_column)?;

    let progress = config.show_progress.then(|| {
        create_main_progress_bar(config.forest.n_estimators as u64, Some("Fitting trees"))
    });
    let forest = RandomForest::fit(
        features.standardized.view(),
        &labels,
        &config.forest,
        progress.as_ref(),
    )?;
    if let Some(pb) = &progress {
        finish_progress_bar(pb, Some("Forest fitted"));
    }

    let predicted = forest.predict(features.standardized.view())?;
    let conditions: Vec<Condition> = predicted.iter().map(|p| map_condition(p)).collect();

    let scored = build_scored_batch(batch, &layout, &features, &predicted, &conditions)?;
    let records = build_records(&paths, &labels, &predicted, &conditions);
    let untimed = count_untimed_paths(&records);
    if untimed > 0 {
        log_warning(
            &format!("{untimed} path values are not timestamps and will sort last"),
            None,
        );
    }

    log::info!(
        "Scored {} rows with {} trees in {:?}",
        records.len(),
        forest.trees().len(),
        start.elapsed()
    );

    let PreparedFeatures {
        feature_names,
        imputer,
        scaler,
        ..
    } = features;

    Ok(PipelineOutput {
        table: ScoredTable::new(scored, records, feature_names)?,
        model: TrainedModel {
            imputer,
            scaler,
            forest,
        },
    })
}

fn required_labels(batch: &RecordBatch, label_column: &str) -> Result<Vec<String>> {
    string_values(batch, label_column)?
        .into_iter()
        .enumerate()
        .map(|(row, label)| {
            label.ok_or_else(|| TrackHealthError::InvalidValue {
                column: label_column.to_string(),
                row,
                value: String::new(),
            })
        })
        .collect()
}

/// Input columns with imputed features, followed by the prediction columns
fn build_scored_batch(
    batch: &RecordBatch,
    layout: &DatasetLayout,
    features: &PreparedFeatures,
    predicted: &[String],
    conditions: &[Condition],
) -> Result<RecordBatch> {
    let schema = scored_schema(&batch.schema(), layout);
    let imputed_columns = features.imputed.axis_iter(Axis(1)).collect::<Vec<_>>();

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    let mut next_feature = 0;
    for (idx, field) in batch.schema().fields().iter().enumerate() {
        if layout.is_feature(idx) {
            let values = imputed_columns[next_feature].iter().copied().collect::<Vec<_>>();
            columns.push(Arc::new(Float64Array::from(values)));
            next_feature += 1;
        } else {
            let values = string_values(batch, field.name())?;
            columns.push(Arc::new(StringArray::from(values)));
        }
    }
    columns.push(Arc::new(StringArray::from_iter_values(predicted)));
    columns.push(Arc::new(StringArray::from_iter_values(
        conditions.iter().map(|c| c.as_str()),
    )));

    RecordBatch::try_new(schema, columns)
        .with_track_context(|| "Failed to assemble scored table".to_string())
}

fn build_records(
    paths: &[Option<String>],
    labels: &[String],
    predicted: &[String],
    conditions: &[Condition],
) -> Vec<TrackRecord> {
    paths
        .iter()
        .zip(labels)
        .zip(predicted.iter().zip(conditions))
        .enumerate()
        .map(|(row, ((path, label), (predicted_label, condition)))| TrackRecord {
            row,
            path: path.clone(),
            path_time: path.as_deref().and_then(parse_path_time),
            label: label.clone(),
            predicted_label: predicted_label.clone(),
            condition: *condition,
        })
        .collect()
}

/// Records with a `path` value that did not parse as a timestamp
fn count_untimed_paths(records: &[TrackRecord]) -> usize {
    records
        .iter()
        .filter(|r| r.path.is_some() && r.path_time.is_none())
        .count()
}
