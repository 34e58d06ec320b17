//! ingot: Import a directory of JSON documents into flat tables
//!
//! Usage:
//!   # Paths from the environment, writes user_data.json
//!   TABLE_CONFIG_PATH=table_config.json FILES_DIR=input_files ingot
//!
//!   # Explicit paths, 8 workers, JSON Lines output
//!   ingot --config table_config.json --input-dir dumps/ --workers 8 --jsonl -o users.jsonl
//!
//!   # Export a nested table without synthetic ids
//!   ingot -c table_config.json -i dumps/ --table user_groups --no-ids

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use ingot::logging::{init_logging, LogConfig, LogFormat};
use ingot::{FailurePolicy, ImportOptions, JsonImporter, OutputFormat, TableWriter};
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "ingot")]
#[command(about = "Import a directory of JSON documents into flat tables", long_about = None)]
struct Args {
    /// Table configuration file
    #[arg(long, short = 'c', env = "TABLE_CONFIG_PATH")]
    config: PathBuf,

    /// Directory of input JSON files (direct entries only)
    #[arg(long, short = 'i', env = "FILES_DIR")]
    input_dir: PathBuf,

    /// Number of parallel workers
    #[arg(long, short = 'w', env = "INGOT_WORKERS", default_value_t = 4)]
    workers: usize,

    /// Table to write (default: the root table)
    #[arg(long)]
    table: Option<String>,

    /// Output file (default: <table>.json in the current directory)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Name of the synthetic UUID column added to every row
    #[arg(long, default_value = "external_id")]
    id_column: String,

    /// Don't add the synthetic UUID column
    #[arg(long, conflicts_with = "id_column")]
    no_ids: bool,

    /// Write one JSON object per line instead of a single array
    #[arg(long)]
    jsonl: bool,

    /// Log and skip files that fail to parse instead of aborting
    #[arg(long)]
    skip_bad_files: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&LogConfig {
        format: args.log_format,
        ..LogConfig::default()
    })?;

    let options = ImportOptions {
        workers: args.workers,
        failure_policy: if args.skip_bad_files {
            FailurePolicy::Skip
        } else {
            FailurePolicy::Abort
        },
    };

    let importer = JsonImporter::new(&args.config, &args.input_dir, options)
        .context("Failed to set up import")?;
    let mut tables = importer.parse_files().context("Import failed")?;

    let table_name = args
        .table
        .unwrap_or_else(|| importer.config().table_name.clone());
    let mut table = tables
        .remove(&table_name)
        .with_context(|| format!("Table not produced by this configuration: {}", table_name))?;

    if !args.no_ids {
        table.add_column_with(args.id_column.as_str(), |_| {
            Value::String(Uuid::new_v4().to_string())
        });
    }

    let format = if args.jsonl {
        OutputFormat::JsonLines
    } else {
        OutputFormat::Records
    };
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", table_name)));

    let mut writer = TableWriter::create(&output, format)?;
    writer.write_table(&table)?;
    writer.flush()?;

    info!(table = %table_name, rows = table.len(), output = %output.display(), "wrote table");
    Ok(())
}
