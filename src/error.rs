//! Error types for the import pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Failure while loading the table configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read table config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while flattening one parsed document
///
/// These carry no file path; [`ImportError::PathResolution`] attaches it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("record path `{path}` not found in document")]
    MissingRecordPath { path: String },

    #[error("record path `{path}` holds {found}, expected an array")]
    NotAnArray { path: String, found: &'static str },

    #[error("record path `{path}` cannot be walked through {found}")]
    NotAnObject { path: String, found: &'static str },

    #[error(
        "nested table `{table}` already has a `{column}` field; set `parent_prefix` to disambiguate the parent id"
    )]
    ParentColumnConflict { table: String, column: String },
}

/// Main error type for the import pipeline
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to list input directory {path}: {source}")]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read input file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse input file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("failed to normalize input file {path}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: NormalizeError,
    },

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl ImportError {
    /// The input file this error is about, if any
    pub fn file(&self) -> Option<&std::path::Path> {
        match self {
            ImportError::FileRead { path, .. }
            | ImportError::Parse { path, .. }
            | ImportError::PathResolution { path, .. } => Some(path),
            _ => None,
        }
    }
}
