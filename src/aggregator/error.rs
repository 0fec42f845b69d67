use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Filesystem error at {path}: {message}")]
    Filesystem { path: PathBuf, message: String },
    #[error("Manifest file does not exist: {0}")]
    ManifestNotFound(PathBuf),
    #[error("No manifest files match pattern: {0}")]
    PatternMatch(String),
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl AggregateError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        AggregateError::Filesystem {
            path: path.into(),
            message: format!("{:#}", err),
        }
    }

    /// Path the error refers to, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            AggregateError::Filesystem { path, .. } | AggregateError::ManifestNotFound(path) => {
                Some(path)
            }
            AggregateError::PatternMatch(_) | AggregateError::InvalidPattern { .. } => None,
        }
    }
}
