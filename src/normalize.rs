//! Single-file normalization
//!
//! Turns one JSON document into per-table record sets. This is the unit of
//! parallel work: it reads nothing but its own file and shares nothing but
//! the read-only [`TableConfig`].

use crate::config::{NestedTableConfig, RecordPath, TableConfig};
use crate::error::{ImportError, NormalizeError, Result};
use crate::table::flatten::{flatten_record, kind_of, PATH_SEPARATOR};
use crate::table::{Record, RecordSet};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Table name -> rows extracted from one file
pub type FileTables = BTreeMap<String, RecordSet>;

/// Read, parse and flatten one input file
pub fn normalize_file(path: &Path, config: &TableConfig) -> Result<FileTables> {
    let mut content = std::fs::read(path).map_err(|source| ImportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value =
        simd_json::serde::from_slice(&mut content).map_err(|e| ImportError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    drop(content);

    normalize_document(document, config).map_err(|source| ImportError::PathResolution {
        path: path.to_path_buf(),
        source,
    })
}

/// Flatten an already-parsed document into per-table record sets
///
/// A document whose root is an array is treated as a sequence of documents.
/// Every configured table is present in the result, possibly empty.
pub fn normalize_document(
    document: Value,
    config: &TableConfig,
) -> std::result::Result<FileTables, NormalizeError> {
    let mut root_rows = RecordSet::new();
    let mut nested_rows: Vec<RecordSet> = vec![RecordSet::new(); config.nested_tables.len()];

    let documents = match document {
        Value::Array(items) => items,
        other => vec![other],
    };

    for doc in documents {
        for element in take_records(doc, &config.record_path)? {
            for (spec, rows) in config.nested_tables.iter().zip(nested_rows.iter_mut()) {
                extract_nested(&element, spec, rows)?;
            }
            root_rows.push(flatten_record(element));
        }
    }

    let mut tables = FileTables::new();
    tables.insert(config.table_name.clone(), root_rows);
    for (spec, rows) in config.nested_tables.iter().zip(nested_rows) {
        tables.insert(spec.table_name.clone(), rows);
    }
    Ok(tables)
}

/// Flatten the children of one root element and link them to it
fn extract_nested(
    element: &Value,
    spec: &NestedTableConfig,
    rows: &mut RecordSet,
) -> std::result::Result<(), NormalizeError> {
    let children = find_nested_records(element, &spec.record_path)?;
    if children.is_empty() {
        return Ok(());
    }

    let parent_values: Vec<(String, Value)> = spec
        .parent_id
        .fields()
        .iter()
        .map(|field| (spec.parent_column(field), lookup_field(element, field)))
        .collect();

    for child in children {
        let mut record: Record = flatten_record(child.clone());
        for (column, value) in &parent_values {
            if record.contains_key(column) {
                return Err(NormalizeError::ParentColumnConflict {
                    table: spec.table_name.clone(),
                    column: column.clone(),
                });
            }
            record.insert(column.clone(), value.clone());
        }
        rows.push(record);
    }
    Ok(())
}

/// Move the root record array out of a document
fn take_records(
    document: Value,
    path: &RecordPath,
) -> std::result::Result<Vec<Value>, NormalizeError> {
    let mut current = document;
    for segment in path.segments() {
        current = match current {
            Value::Object(mut obj) => obj.remove(segment).ok_or_else(|| {
                NormalizeError::MissingRecordPath {
                    path: path.to_string(),
                }
            })?,
            other => {
                return Err(NormalizeError::NotAnObject {
                    path: path.to_string(),
                    found: kind_of(&other),
                })
            }
        };
    }

    match current {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Err(NormalizeError::NotAnArray {
            path: path.to_string(),
            found: kind_of(&other),
        }),
    }
}

/// Borrow a nested record array; a missing or null array means no rows
fn find_nested_records<'a>(
    element: &'a Value,
    path: &RecordPath,
) -> std::result::Result<&'a [Value], NormalizeError> {
    let mut current = element;
    for segment in path.segments() {
        current = match current {
            Value::Object(obj) => match obj.get(segment) {
                Some(next) => next,
                None => return Ok(&[]),
            },
            Value::Null => return Ok(&[]),
            other => {
                return Err(NormalizeError::NotAnObject {
                    path: path.to_string(),
                    found: kind_of(other),
                })
            }
        };
    }

    match current {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(&[]),
        other => Err(NormalizeError::NotAnArray {
            path: path.to_string(),
            found: kind_of(other),
        }),
    }
}

/// Resolve a possibly dotted field name against a record, null on miss
///
/// A literal key wins over a dotted walk, mirroring how flattened columns
/// are named.
pub fn lookup_field(record: &Value, field: &str) -> Value {
    if let Some(value) = record.get(field) {
        return value.clone();
    }

    let mut current = record;
    for segment in field.split(PATH_SEPARATOR) {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Value::Null,
        }
    }
    current.clone()
}
