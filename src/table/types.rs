use crate::config::ColumnMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// One flattened row: dotted field path -> value
pub type Record = Map<String, Value>;

/// Ordered rows of one table, before projection
///
/// Produced per file by the normalizer and concatenated by the merger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new() -> Self {
        RecordSet::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Append all rows of `other`, keeping their order
    pub fn append(&mut self, other: RecordSet) {
        self.records.extend(other.records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        RecordSet { records }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A finished output table: a column header plus rows aligned to it
///
/// Rows are numbered densely from zero by position. A row that had no value
/// for a column holds `null` there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given header
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Table {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Keep every field, columns in first-seen order across all records
    pub fn from_records(records: &RecordSet) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Table { columns, rows }
    }

    /// Select, reorder and rename columns per `columns`
    ///
    /// Source keys that no record has become all-null columns; fields not
    /// named in `columns` are dropped.
    pub fn project(records: &RecordSet, columns: &ColumnMap) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                columns
                    .source_keys()
                    .map(|key| record.get(key).cloned().unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Table {
            columns: columns.output_names().map(str::to_string).collect(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Value at `row` in column `name`
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All values of column `name`, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Append a column whose value for each row comes from `value_for`
    pub fn add_column_with<F>(&mut self, name: impl Into<String>, mut value_for: F)
    where
        F: FnMut(usize) -> Value,
    {
        self.columns.push(name.into());
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row.push(value_for(idx));
        }
    }

    /// Row `index` as an object keyed by column name
    pub fn record(&self, index: usize) -> Option<Record> {
        let row = self.rows.get(index)?;
        Some(
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect(),
        )
    }
}

struct RowRef<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, value) in self.columns.iter().zip(self.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl Table {
    /// Serializable view of one row, keys in column order
    pub(crate) fn row_view(&self, index: usize) -> Option<impl Serialize + '_> {
        self.rows.get(index).map(|values| RowRef {
            columns: &self.columns,
            values,
        })
    }
}

/// Serializes as an array of row objects
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for values in &self.rows {
            seq.serialize_element(&RowRef {
                columns: &self.columns,
                values,
            })?;
        }
        seq.end()
    }
}
