//! Error handling for the track health pipeline.
//!
//! Every failure in the pipeline is an input failure of some kind (missing
//! file, missing column, value that cannot be coerced) and aborts the run.
//! There is no retry layer.

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

pub use util::{TrackResultExt, safe_open_file};

/// Specialized error type for the track health pipeline
#[derive(Debug, thiserror::Error)]
pub enum TrackHealthError {
    /// Error opening or reading a file
    #[error("IO error: {message}{}", path_suffix(.path.as_deref()))]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<io::Error>,
    },

    /// Error raised by an Arrow kernel or the delimited-text reader/writer
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error decoding a Parquet dataset
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error decoding a JSON configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A column the pipeline relies on is absent from the dataset
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// A cell could not be coerced to the type its column requires
    #[error("Invalid value in column '{column}' at row {row}: '{value}'")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// The dataset has no rows, no feature columns or an all-missing column
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error evaluating a filter expression
    #[error("Filter error: {0}")]
    Filter(String),

    /// Error fitting or applying the classifier
    #[error("Model error: {0}")]
    Model(String),

    /// A maintenance acknowledgement named a row that is not an open emergency
    #[error("Row {0} is not a dangerous track segment")]
    NotAnEmergency(usize),

    /// Any of the above with an additional description of what was being done
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<TrackHealthError>,
    },
}

fn path_suffix(path: Option<&Path>) -> String {
    path.map(|p| format!(" ({})", p.display())).unwrap_or_default()
}

impl TrackHealthError {
    /// Create an IO error with a message and no underlying source
    #[must_use]
    pub fn io_error(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create an IO error wrapping the original `io::Error`
    #[must_use]
    pub fn io_error_with_source(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
            source: Some(source),
        }
    }

    /// Create a filter error
    #[must_use]
    pub fn filter_error(message: impl Into<String>) -> Self {
        Self::Filter(message.into())
    }

    /// Create a model error
    #[must_use]
    pub fn model_error(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Attach the path of the file involved in the failure
    ///
    /// IO errors record the path directly; other errors are wrapped in a
    /// context entry naming the path.
    #[must_use]
    pub fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Io {
                message, source, ..
            } => Self::Io {
                message,
                path: Some(path.to_path_buf()),
                source,
            },
            other => other.context(format!("While processing {}", path.display())),
        }
    }

    /// Wrap the error with a description of the operation that failed
    #[must_use]
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type for track health operations
pub type Result<T> = std::result::Result<T, TrackHealthError>;
