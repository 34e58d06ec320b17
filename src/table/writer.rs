use crate::table::types::Table;
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Layout of a written table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON array of row objects
    #[default]
    Records,
    /// One row object per line
    JsonLines,
}

/// Writes output tables as JSON
pub struct TableWriter<W: Write> {
    writer: W,
    format: OutputFormat,
}

impl TableWriter<BufWriter<std::fs::File>> {
    /// Create a writer for a file, creating its parent directory if needed
    pub fn create<P: AsRef<Path>>(path: P, format: OutputFormat) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create output directory: {}", parent.display()))?;
        }

        let file = std::fs::File::create(path)
            .context(format!("Failed to open file: {}", path.display()))?;
        Ok(TableWriter::new(BufWriter::new(file), format))
    }
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, format: OutputFormat) -> Self {
        TableWriter { writer, format }
    }

    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        match self.format {
            OutputFormat::Records => {
                serde_json::to_writer(&mut self.writer, table)
                    .context("Failed to serialize table")?;
            }
            OutputFormat::JsonLines => {
                for idx in 0..table.len() {
                    if let Some(row) = table.row_view(idx) {
                        serde_json::to_writer(&mut self.writer, &row)
                            .context("Failed to serialize row")?;
                        writeln!(self.writer).context("Failed to write row")?;
                    }
                }
            }
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }
}
