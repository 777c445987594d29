//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, TrackHealthError};

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(TrackHealthError::io_error("File not found")
            .with_path(path)
            .context(format!("Needed for: {purpose}")));
    }

    if !path.is_file() {
        return Err(TrackHealthError::io_error("Path is not a file")
            .with_path(path)
            .context(format!("Expected a file for: {purpose}")));
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    "Permission denied - check file permissions".to_string()
                }
                io::ErrorKind::NotFound => {
                    "File not found - it may have been deleted during operation".to_string()
                }
                _ => format!("Failed to open file for: {purpose}"),
            };

            Err(TrackHealthError::io_error_with_source(context, e).with_path(path))
        }
    }
}

/// Extension trait adding pipeline context to foreign results
pub trait TrackResultExt<T> {
    /// Add a context message, evaluated lazily
    fn with_track_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add context about the column being processed
    fn with_column_context(self, column_name: &str) -> Result<T>;
}

impl<T, E> TrackResultExt<T> for std::result::Result<T, E>
where
    E: Into<TrackHealthError>,
{
    fn with_track_context<F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().context(context()))
    }

    fn with_column_context(self, column_name: &str) -> Result<T> {
        self.map_err(|e| {
            e.into()
                .context(format!("Error processing column '{column_name}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported_with_purpose() {
        let err = safe_open_file(Path::new("/definitely/not/here.csv"), "track dataset")
            .expect_err("file should not exist");
        let message = err.to_string();
        assert!(message.contains("Needed for: track dataset"));
        assert!(matches!(err.root(), TrackHealthError::Io { .. }));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = safe_open_file(dir.path(), "track dataset").expect_err("directory");
        assert!(err.to_string().contains("Expected a file"));
    }
}
