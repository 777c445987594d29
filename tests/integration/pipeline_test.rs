use std::fs::File;
use std::sync::Arc;

use arrow::array::{Array, AsArray, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use track_health::{Condition, TrackHealthError, run_pipeline, train_and_predict};

use crate::utils::{
    CLUSTER_LABELS, THREE_ROWS, clustered_csv, config_for, dataset_file, quick_config_for,
};

#[test]
fn three_rows_map_to_one_condition_each() {
    let (_dir, path) = dataset_file("tracks.csv", THREE_ROWS);
    let table = train_and_predict(&config_for(path)).expect("pipeline runs");

    let records = table.records();
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.condition).collect::<Vec<_>>(),
        vec![Condition::Good, Condition::Ok, Condition::Danger]
    );
    for record in records {
        assert_eq!(record.predicted_label, record.label);
    }

    let schema = table.batch().schema();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(
        names,
        vec!["path", "rms", "kurtosis", "label", "Predicted_Label", "Condition"]
    );
    let conditions = table.batch().column(5).as_string::<i32>();
    assert_eq!(conditions.value(2), "Danger");
}

#[test]
fn missing_feature_is_filled_with_column_mean() {
    let csv = "\
path,rms,label
2024-01-01,1.0,normal_like
2024-01-02,,normal_like
2024-01-03,3.0,bearing_fault
";
    let (_dir, path) = dataset_file("gaps.csv", csv);
    let table = train_and_predict(&quick_config_for(path)).expect("pipeline runs");

    let rms = table.batch().column(1).as_primitive::<Float64Type>();
    assert_eq!(rms.null_count(), 0);
    assert!((rms.value(1) - 2.0).abs() < 1e-12);
    assert!((rms.value(0) - 1.0).abs() < 1e-12);
}

#[test]
fn repeated_runs_give_identical_predictions() {
    let (_dir, path) = dataset_file("clusters.csv", &clustered_csv(12));
    let config = quick_config_for(path);

    let first = train_and_predict(&config).expect("first run");
    let second = train_and_predict(&config).expect("second run");
    assert_eq!(first.records(), second.records());
}

#[test]
fn clustered_dataset_is_recovered_in_sample() {
    let (_dir, path) = dataset_file("clusters.csv", &clustered_csv(30));
    let output = run_pipeline(&config_for(path)).expect("pipeline runs");

    let records = output.table.records();
    assert_eq!(records.len(), 30);
    for record in records {
        assert_eq!(record.predicted_label, CLUSTER_LABELS[record.row % 3]);
    }
    assert_eq!(output.table.rows_with_condition(Condition::Danger).len(), 10);
    assert_eq!(output.model.forest.trees().len(), 200);

    let mut classes = CLUSTER_LABELS.map(str::to_string).to_vec();
    classes.sort();
    assert_eq!(output.model.forest.classes(), classes.as_slice());
}

#[test]
fn non_numeric_feature_cell_is_rejected() {
    let csv = "\
path,rms,label
a,1.0,normal_like
b,loud,bearing_fault
";
    let (_dir, path) = dataset_file("bad.csv", csv);
    let err = train_and_predict(&quick_config_for(path)).expect_err("cell is not a number");

    match err.root() {
        TrackHealthError::InvalidValue { column, row, value } => {
            assert_eq!(column, "rms");
            assert_eq!(*row, 1);
            assert_eq!(value, "loud");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_label_column_is_rejected() {
    let (_dir, path) = dataset_file("nolabel.csv", "path,rms\na,1.0\nb,2.0\n");
    let err = train_and_predict(&quick_config_for(path)).expect_err("label column missing");
    assert!(matches!(err.root(), TrackHealthError::MissingColumn(c) if c == "label"));
}

#[test]
fn feature_without_any_value_is_rejected() {
    let (_dir, path) = dataset_file("empty.csv", "path,rms,gap,label\na,1.0,,x\nb,2.0,,y\n");
    let err = train_and_predict(&quick_config_for(path)).expect_err("no mean for gap");
    assert!(matches!(err.root(), TrackHealthError::EmptyData(msg) if msg.contains("gap")));
}

#[test]
fn missing_dataset_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = train_and_predict(&quick_config_for(dir.path().join("absent.csv")))
        .expect_err("file missing");
    assert!(matches!(err.root(), TrackHealthError::Io { .. }));
}

#[test]
fn parquet_datasets_are_scored_like_csv() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("path", DataType::Utf8, true),
        Field::new("rms", DataType::Float64, true),
        Field::new("label", DataType::Utf8, false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec![
                "2024-01-01 08:00:00",
                "2024-01-01 09:00:00",
                "2024-01-01 10:00:00",
            ])),
            Arc::new(Float64Array::from(vec![Some(0.1), None, Some(20.0)])),
            Arc::new(StringArray::from(vec![
                "normal_like",
                "misalignment_like",
                "unbalance_like",
            ])),
        ],
    )
    .expect("batch");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("tracks.parquet");
    let mut writer =
        ArrowWriter::try_new(File::create(&path).expect("create"), schema, None).expect("writer");
    writer.write(&batch).expect("write");
    writer.close().expect("close");

    let table = train_and_predict(&config_for(path)).expect("pipeline runs");
    let rms = table.batch().column(1).as_primitive::<Float64Type>();
    assert!((rms.value(1) - 10.05).abs() < 1e-9);
    assert_eq!(table.records()[2].condition, Condition::Danger);
}
