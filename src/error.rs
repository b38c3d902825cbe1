use std::path::PathBuf;

use arrow::error::ArrowError;

/// Everything that can stop the dashboard from starting.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: '{value}' is not a recognised date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: column '{column}' has a null value")]
    NullValue { row: usize, column: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}
