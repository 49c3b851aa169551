//! Error types for the speech SVM harness

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SVMError {
    #[error("cannot read file {}: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed record: sample {sample}, field {field} (line {line}): {reason}")]
    MalformedRecord {
        sample: usize,
        field: usize,
        line: usize,
        reason: String,
    },

    #[error("unexpected data after {samples} samples (line {line})")]
    TrailingData { samples: usize, line: usize },

    #[error("invalid label {label} for sample {sample}: expected an integer in 1..={n_classes}")]
    InvalidLabel {
        sample: usize,
        label: f32,
        n_classes: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SVMError>;
