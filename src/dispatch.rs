//! Parallel dispatch of single-file normalization
//!
//! Files are normalized on a fixed-size rayon pool. Results always come back
//! in the order the files were given, whatever order the workers finish in.

use crate::config::TableConfig;
use crate::error::{ImportError, Result};
use crate::normalize::{normalize_file, FileTables};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when one file fails to normalize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Fail the whole dispatch with the failing file's error
    #[default]
    Abort,
    /// Log the failure and leave the file out
    Skip,
}

/// Normalization output of one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub file: PathBuf,
    pub tables: FileTables,
}

/// Normalize every file on a pool of `worker_count` threads
pub fn dispatch(
    files: &[PathBuf],
    config: &TableConfig,
    worker_count: usize,
    policy: FailurePolicy,
) -> Result<Vec<FileResult>> {
    if worker_count == 0 {
        return Err(ImportError::InvalidWorkerCount);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count)
        .thread_name(|idx| format!("ingot-worker-{}", idx))
        .build()?;

    debug!(files = files.len(), workers = worker_count, "dispatching input files");

    match policy {
        FailurePolicy::Abort => pool.install(|| {
            files
                .par_iter()
                .map(|file| normalize_one(file, config))
                .collect::<Result<Vec<_>>>()
        }),
        FailurePolicy::Skip => {
            let outcomes: Vec<Result<FileResult>> = pool.install(|| {
                files
                    .par_iter()
                    .map(|file| normalize_one(file, config))
                    .collect()
            });

            Ok(outcomes
                .into_iter()
                .filter_map(|outcome| match outcome {
                    Ok(result) => Some(result),
                    Err(err) => {
                        warn!(error = %err, "skipping input file");
                        None
                    }
                })
                .collect())
        }
    }
}

fn normalize_one(file: &Path, config: &TableConfig) -> Result<FileResult> {
    debug!(file = %file.display(), "parsing");
    let tables = normalize_file(file, config)?;
    info!(file = %file.display(), "finished parsing");

    Ok(FileResult {
        file: file.to_path_buf(),
        tables,
    })
}
