//! Directory importer: configuration + input discovery + pipeline run

use crate::config::TableConfig;
use crate::dispatch::{dispatch, FailurePolicy};
use crate::error::{ImportError, Result};
use crate::merge::{merge_and_project, Tables};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime options for an import run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Size of the worker pool
    pub workers: usize,

    pub failure_policy: FailurePolicy,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            workers: 4,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Imports every file of a directory into the configured tables
///
/// The configuration is read and the directory is listed once, at
/// construction; [`JsonImporter::parse_files`] can then be run repeatedly.
#[derive(Debug, Clone)]
pub struct JsonImporter {
    config: TableConfig,
    files: Vec<PathBuf>,
    options: ImportOptions,
}

impl JsonImporter {
    pub fn new<C, D>(config_path: C, files_dir: D, options: ImportOptions) -> Result<Self>
    where
        C: AsRef<Path>,
        D: AsRef<Path>,
    {
        let config = TableConfig::load(config_path)?;
        let files = discover_files(files_dir.as_ref())?;
        Ok(Self::with_files(config, files, options))
    }

    /// Build an importer over an explicit file list
    pub fn with_files(config: TableConfig, files: Vec<PathBuf>, options: ImportOptions) -> Self {
        JsonImporter {
            config,
            files,
            options,
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Normalize all files in parallel, merge, and project
    pub fn parse_files(&self) -> Result<Tables> {
        info!(
            files = self.files.len(),
            workers = self.options.workers,
            table = %self.config.table_name,
            "starting import"
        );

        let results = dispatch(
            &self.files,
            &self.config,
            self.options.workers,
            self.options.failure_policy,
        )?;

        Ok(merge_and_project(results, &self.config))
    }
}

/// List the direct entries of `dir`, sorted, skipping dot-files
///
/// Entries are not filtered by extension or type; anything that is not a
/// readable JSON file fails later, during normalization.
pub fn discover_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| ImportError::InputDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ImportError::InputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        files.push(entry.path());
    }

    files.sort();
    Ok(files)
}
