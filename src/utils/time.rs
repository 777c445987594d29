//! Timestamp parsing for the dataset's `path` column.
//!
//! Paths are either bare timestamps (`2024-03-01 12:30:00`) or file paths
//! whose stem is a timestamp (`recordings/2024-03-01_12-30-00.wav`).

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Display format used for parsed timestamps
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d_%H-%M-%S",
    "%Y%m%d_%H%M%S",
    "%Y%m%dT%H%M%S",
    "%Y%m%d%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Parse the timestamp carried by a `path` value
///
/// Returns `None` when neither the whole value nor its file stem is a
/// recognised timestamp.
#[must_use]
pub fn parse_path_time(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    parse_timestamp(trimmed).or_else(|| {
        Path::new(trimmed)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| *stem != trimmed)
            .and_then(parse_timestamp)
    })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Format a parsed timestamp for display and export
#[must_use]
pub fn format_path_time(time: &NaiveDateTime) -> String {
    time.format(DISPLAY_FORMAT).to_string()
}
