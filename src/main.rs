use std::path::PathBuf;

use anyhow::Context;
use log::info;
use track_health::PipelineConfig;
use track_health::dashboard::Dashboard;
use track_health::train_and_predict;
use track_health::utils::logging::{DEFAULT_PREVIEW_ROWS, print_dashboard};

#[global_allocator]
static ALLOC: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;

const DATASET_ENV: &str = "TRACK_HEALTH_DATASET";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => PipelineConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dataset) = std::env::var_os(DATASET_ENV) {
        config = config.with_dataset_path(dataset);
    }
    info!("{config}");

    let table = train_and_predict(&config).context("Track health pipeline failed")?;
    let dashboard = Dashboard::new(table);
    print_dashboard(&dashboard, DEFAULT_PREVIEW_ROWS)?;

    if dashboard.emergencies().is_empty() {
        info!("No dangerous conditions detected, nothing to export");
        return Ok(());
    }

    let export_path = config.dataset_path.with_file_name(&config.export_file_name);
    let rows = dashboard
        .write_emergency_csv(&export_path)
        .with_context(|| format!("Failed to export alerts to {}", export_path.display()))?;
    info!("Exported {rows} emergency alerts to {}", export_path.display());

    Ok(())
}
