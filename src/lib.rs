//! # Ingot - JSON Directory Importer
//!
//! Turns a directory of JSON documents (API dumps and the like) into flat
//! tables. Each document's record array is flattened into dotted columns,
//! nested arrays can be split into child tables linked to their parent row,
//! results are merged across files and the root table is projected onto a
//! configured set of renamed columns.
//!
//! ## Modules
//!
//! - **config**: the declarative table configuration
//! - **normalize**: one document -> per-table record sets
//! - **dispatch**: fan normalization out over a worker pool
//! - **merge**: concatenate across files and project columns
//! - **table**: flattening, record sets, output tables and writers
//!
//! ## Quick Start
//!
//! ```rust
//! use ingot::{normalize_document, TableConfig};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = TableConfig::from_json_str(r#"{
//!     "record_path": "value",
//!     "table_name": "user_data",
//!     "columns": {"id": "id", "signInActivity.lastSignInDateTime": "last_signin"}
//! }"#)?;
//!
//! let doc = json!({
//!     "value": [
//!         {"id": "user1", "signInActivity": {"lastSignInDateTime": "2023-01-01T10:00:00Z"}}
//!     ]
//! });
//!
//! let tables = normalize_document(doc, &config)?;
//! let users = &tables["user_data"];
//! assert_eq!(users.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! For whole directories use [`JsonImporter`]:
//!
//! ```no_run
//! use ingot::{ImportOptions, JsonImporter};
//!
//! # fn main() -> anyhow::Result<()> {
//! let importer = JsonImporter::new("table_config.json", "input_files", ImportOptions::default())?;
//! let tables = importer.parse_files()?;
//! let users = &tables["user_data"];
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod importer;
pub mod logging;
pub mod merge;
pub mod normalize;
pub mod table;

// Re-export commonly used types for convenience
pub use config::{ColumnMap, NestedTableConfig, ParentId, RecordPath, TableConfig};
pub use dispatch::{dispatch, FailurePolicy, FileResult};
pub use error::{ConfigError, ImportError, NormalizeError, Result};
pub use importer::{discover_files, ImportOptions, JsonImporter};
pub use merge::{merge, merge_and_project, Tables};
pub use normalize::{normalize_document, normalize_file, FileTables};
pub use table::{OutputFormat, Record, RecordSet, Table, TableWriter};

/// Main entry point: import a directory with the given table configuration
pub fn import_dir<C, D>(config_path: C, files_dir: D, options: ImportOptions) -> Result<Tables>
where
    C: AsRef<std::path::Path>,
    D: AsRef<std::path::Path>,
{
    JsonImporter::new(config_path, files_dir, options)?.parse_files()
}
