use track_health::dashboard::{Dashboard, condition_definitions};
use track_health::utils::logging::{DashboardReport, render_dashboard, render_table};
use track_health::{Condition, TrackHealthError, train_and_predict};

use crate::utils::{THREE_ROWS, config_for, dataset_file, scored_clusters};

fn clustered_dashboard() -> Dashboard {
    Dashboard::new(scored_clusters(12))
}

#[test]
fn summary_counts_every_condition() {
    let dashboard = clustered_dashboard();
    let summary = dashboard.summary();

    assert_eq!(summary.counts.good, 4);
    assert_eq!(summary.counts.ok, 4);
    assert_eq!(summary.counts.danger, 4);
    assert!(summary.banner.is_alert());
    assert_eq!(summary.banner.headline, "Dangerous Tracks: 4");
    assert_eq!(summary.banner.caption, "Immediate inspection required");

    let total: usize = summary.chart.iter().map(|s| s.count).sum();
    assert_eq!(total, 12);
}

#[test]
fn emergencies_are_newest_first() {
    let dashboard = clustered_dashboard();
    let rows: Vec<usize> = dashboard.emergencies().iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![11, 8, 5, 2]);
}

#[test]
fn acknowledged_rows_leave_the_emergency_list() {
    let mut dashboard = clustered_dashboard();

    assert!(dashboard.acknowledge(8).expect("row 8 is dangerous"));
    assert!(!dashboard.acknowledge(8).expect("second acknowledgement"));

    let rows: Vec<usize> = dashboard.emergencies().iter().map(|r| r.row).collect();
    assert_eq!(rows, vec![11, 5, 2]);

    let detail = dashboard.select(8).expect("row 8 has a detail view");
    assert!(detail.maintenance_done);
    assert_eq!(detail.predicted_fault, "bearing_fault");
    assert_eq!(detail.time, "2024-02-01 08:00:00");

    // Acknowledgement does not change the headline counts
    assert_eq!(dashboard.summary().counts.danger, 4);
}

#[test]
fn only_dangerous_rows_can_be_acknowledged() {
    let mut dashboard = clustered_dashboard();
    assert!(matches!(
        dashboard.acknowledge(0),
        Err(TrackHealthError::NotAnEmergency(0))
    ));
    assert!(matches!(
        dashboard.acknowledge(500),
        Err(TrackHealthError::NotAnEmergency(500))
    ));
    assert!(dashboard.select(0).is_none());
    assert!(dashboard.maintenance().is_empty());
}

#[test]
fn csv_export_has_header_and_one_line_per_emergency() {
    let mut dashboard = clustered_dashboard();
    dashboard.acknowledge(2).expect("row 2 is dangerous");

    let csv = String::from_utf8(dashboard.emergency_csv().expect("csv")).expect("utf-8");
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(
        lines[0],
        "path,rms,peak,kurtosis,label,Predicted_Label,Condition,Maintenance_Done,Severity,path_time"
    );
    assert_eq!(lines.len(), 1 + 3);
    assert!(lines[1].starts_with("2024-02-01 11:00:00,"));
    assert!(lines[1].ends_with(",bearing_fault,bearing_fault,Danger,false,3,2024-02-01 11:00:00"));
}

#[test]
fn csv_export_is_written_to_disk() {
    let dashboard = clustered_dashboard();
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("railway_emergency_alerts.csv");

    let rows = dashboard.write_emergency_csv(&path).expect("export");
    assert_eq!(rows, 4);

    let written = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(written.lines().count(), 5);
    assert_eq!(written.as_bytes(), dashboard.emergency_csv().expect("csv").as_slice());
}

#[test]
fn healthy_dataset_shows_all_clear() {
    let csv = "\
path,rms,label
2024-01-01,0.1,normal_like
2024-01-02,0.2,misalignment_like
2024-01-03,0.3,normal_like
";
    let (_dir, path) = dataset_file("healthy.csv", csv);
    let dashboard = Dashboard::new(train_and_predict(&config_for(path)).expect("pipeline runs"));

    let banner = &dashboard.summary().banner;
    assert!(!banner.is_alert());
    assert_eq!(banner.headline, "Dangerous Tracks: 0");
    assert_eq!(banner.caption, "All track segments are safe");
    assert!(dashboard.emergencies().is_empty());

    let text = render_dashboard(&dashboard);
    assert!(text.contains("No dangerous conditions detected"));
}

#[test]
fn rendered_dashboard_lists_definitions_and_table() {
    let (_dir, path) = dataset_file("tracks.csv", THREE_ROWS);
    let dashboard = Dashboard::new(train_and_predict(&config_for(path)).expect("pipeline runs"));

    let text = render_dashboard(&dashboard);
    assert_eq!(DashboardReport(&dashboard).to_string(), text);
    assert!(text.starts_with("Railway Track Health Monitoring Dashboard\n"));
    assert!(text.contains("Dangerous Tracks: 1"));
    assert!(text.contains("1 Dangerous Track Segments"));
    for definition in condition_definitions() {
        assert!(text.contains(definition.title));
    }

    let table = render_table(dashboard.table().batch(), 2).expect("table renders");
    assert!(table.contains("Predicted_Label"));
    assert!(table.contains(Condition::Good.as_str()));
    assert!(!table.contains("bearing_fault"));
}
