//! Cross-file merge and column projection

use crate::config::TableConfig;
use crate::dispatch::FileResult;
use crate::table::{RecordSet, Table};
use std::collections::BTreeMap;
use tracing::info;

/// Table name -> finished output table
pub type Tables = BTreeMap<String, Table>;

/// Concatenate per-file record sets by table name
///
/// Rows keep file order first, then their order within the file.
pub fn merge(results: Vec<FileResult>) -> BTreeMap<String, RecordSet> {
    let mut merged: BTreeMap<String, RecordSet> = BTreeMap::new();
    for result in results {
        for (table, rows) in result.tables {
            merged.entry(table).or_default().append(rows);
        }
    }
    merged
}

/// Merge every file's fragments and shape them into output tables
///
/// The root table is projected onto `config.columns`. A nested table is
/// projected only when it declares its own `columns`; otherwise it keeps
/// every raw field. Every configured table is present, even without rows.
pub fn merge_and_project(results: Vec<FileResult>, config: &TableConfig) -> Tables {
    let mut tables = Tables::new();
    for (name, rows) in merge(results) {
        let table = if name == config.table_name {
            Table::project(&rows, &config.columns)
        } else {
            let columns = config
                .nested_tables
                .iter()
                .find(|n| n.table_name == name)
                .and_then(|n| n.columns.as_ref());
            match columns {
                Some(columns) => Table::project(&rows, columns),
                None => Table::from_records(&rows),
            }
        };
        tables.insert(name, table);
    }

    if !tables.contains_key(&config.table_name) {
        tables.insert(
            config.table_name.clone(),
            Table::project(&RecordSet::new(), &config.columns),
        );
    }
    for nested in &config.nested_tables {
        if !tables.contains_key(&nested.table_name) {
            let table = match &nested.columns {
                Some(columns) => Table::project(&RecordSet::new(), columns),
                None => Table::default(),
            };
            tables.insert(nested.table_name.clone(), table);
        }
    }

    for (name, table) in &tables {
        info!(table = %name, rows = table.len(), columns = table.columns().len(), "finished merging");
    }
    tables
}
