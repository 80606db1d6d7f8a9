use std::path::PathBuf;
use thiserror::Error;

use crate::core::operations::FileOpError;

/// Result type for dataset splitting
pub type SplitResult<T> = Result<T, SplitError>;

/// Everything that can abort a split or a manifest write.
///
/// All variants are fatal. Nothing already written to the output
/// directory is rolled back.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("Invalid split ratio {spec:?}: {reason} (expected e.g. '7:2:1' or '8:2')")]
    InvalidRatio { spec: String, reason: String },

    #[error("Source pool mismatch ({images} images, {labels} labels): {detail}")]
    SourceMismatch {
        images: usize,
        labels: usize,
        detail: String,
    },

    #[error("Split directory already exists: {0:?}")]
    DirectoryConflict(PathBuf),

    #[error("Refusing output {path:?}: {reason}")]
    InvalidOutput { path: PathBuf, reason: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    FileOp(#[from] FileOpError),

    #[error("Failed to serialize manifest: {0}")]
    Manifest(#[from] serde_yaml::Error),

    #[error("Invalid config file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl SplitError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SplitError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_ratio(spec: &str, reason: impl Into<String>) -> Self {
        SplitError::InvalidRatio {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
