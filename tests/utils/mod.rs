use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use track_health::algorithm::forest::ForestConfig;
use track_health::{PipelineConfig, ScoredTable, train_and_predict};

/// Labels of the three synthetic clusters, in row order modulo 3
pub const CLUSTER_LABELS: [&str; 3] = ["normal_like", "misalignment_like", "bearing_fault"];

/// Three rows, one per condition
pub const THREE_ROWS: &str = "\
path,rms,kurtosis,label
2024-01-01 08:00:00,0.10,3.0,normal_like
2024-01-01 09:00:00,0.50,3.4,misalignment_like
2024-01-01 10:00:00,0.90,7.5,bearing_fault
";

/// Write `contents` to `name` inside a fresh temporary directory
///
/// The directory is removed when the returned guard is dropped.
#[must_use]
pub fn dataset_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write dataset");
    (dir, path)
}

/// `n` rows in three well separated clusters; row `i` belongs to cluster `i % 3`
/// and its timestamp increases with `i`
#[must_use]
pub fn clustered_csv(n: usize) -> String {
    let mut csv = String::from("path,rms,peak,kurtosis,label\n");
    for i in 0..n {
        let cluster = i % 3;
        let base = cluster as f64 * 10.0;
        let jitter = i as f64 * 0.01;
        csv.push_str(&format!(
            "2024-02-{:02} {:02}:00:00,{:.3},{:.3},{:.3},{}\n",
            1 + i / 24,
            i % 24,
            base + jitter,
            base * 2.0 + jitter,
            3.0 + base - jitter,
            CLUSTER_LABELS[cluster]
        ));
    }
    csv
}

/// Default configuration pointed at `path`
#[must_use]
pub fn config_for(path: PathBuf) -> PipelineConfig {
    PipelineConfig::default().with_dataset_path(path)
}

/// Configuration with a smaller forest, for tests that fit repeatedly
#[must_use]
pub fn quick_config_for(path: PathBuf) -> PipelineConfig {
    PipelineConfig {
        forest: ForestConfig {
            n_estimators: 40,
            ..ForestConfig::default()
        },
        ..config_for(path)
    }
}

/// Score a clustered dataset of `n` rows
#[must_use]
pub fn scored_clusters(n: usize) -> ScoredTable {
    let (_dir, path) = dataset_file("clusters.csv", &clustered_csv(n));
    train_and_predict(&quick_config_for(path)).expect("pipeline runs")
}
