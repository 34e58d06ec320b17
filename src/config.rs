//! Table configuration
//!
//! Declares which array of records becomes the root table, which columns
//! survive (and under what names), and which nested arrays become child
//! tables linked back to their parent record.
//!
//! ```json
//! {
//!   "record_path": "value",
//!   "table_name": "user_data",
//!   "columns": {"id": "id", "signInActivity.lastSignInDateTime": "last_signin"},
//!   "nested_tables": [
//!     {"table_name": "user_groups", "record_path": "groups", "parent_id": "id"}
//!   ]
//! }
//! ```

use crate::error::ConfigError;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Location of a record array inside a document
///
/// A plain string is a single key, even when it contains dots. A list of
/// keys is walked one level at a time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordPath {
    Key(String),
    Path(Vec<String>),
}

impl RecordPath {
    pub fn segments(&self) -> &[String] {
        match self {
            RecordPath::Key(key) => std::slice::from_ref(key),
            RecordPath::Path(keys) => keys,
        }
    }
}

impl fmt::Display for RecordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPath::Key(key) => write!(f, "{}", key),
            RecordPath::Path(keys) => write!(f, "{}", keys.join(".")),
        }
    }
}

/// Root-record field(s) copied into every nested row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParentId {
    One(String),
    Many(Vec<String>),
}

impl ParentId {
    pub fn fields(&self) -> &[String] {
        match self {
            ParentId::One(field) => std::slice::from_ref(field),
            ParentId::Many(fields) => fields,
        }
    }
}

/// Ordered source column -> output column mapping
///
/// Declaration order is the output column order. A repeated source key
/// keeps its first position and takes the last output name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    entries: Vec<(String, String)>,
}

impl ColumnMap {
    pub fn new() -> Self {
        ColumnMap::default()
    }

    pub fn insert(&mut self, source: impl Into<String>, output: impl Into<String>) {
        let source = source.into();
        let output = output.into();
        match self.entries.iter_mut().find(|(key, _)| *key == source) {
            Some(entry) => entry.1 = output,
            None => self.entries.push((source, output)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, o)| (s.as_str(), o.as_str()))
    }

    pub fn source_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(s, _)| s.as_str())
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, o)| o.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, O: Into<String>> FromIterator<(S, O)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (S, O)>>(iter: I) -> Self {
        let mut columns = ColumnMap::new();
        for (source, output) in iter {
            columns.insert(source, output);
        }
        columns
    }
}

impl<'de> Deserialize<'de> for ColumnMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ColumnMapVisitor;

        impl<'de> Visitor<'de> for ColumnMapVisitor {
            type Value = ColumnMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping source columns to output column names")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ColumnMap, A::Error> {
                let mut columns = ColumnMap::new();
                while let Some((source, output)) = access.next_entry::<String, String>()? {
                    columns.insert(source, output);
                }
                Ok(columns)
            }
        }

        deserializer.deserialize_map(ColumnMapVisitor)
    }
}

/// A child table pulled out of an array inside each root record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NestedTableConfig {
    pub table_name: String,

    /// Relative to the root record
    pub record_path: RecordPath,

    pub parent_id: ParentId,

    /// Prepended to each copied parent id column name
    #[serde(default)]
    pub parent_prefix: String,

    /// When present, the nested table is projected like the root table
    #[serde(default)]
    pub columns: Option<ColumnMap>,
}

impl NestedTableConfig {
    /// Output column name for a copied parent id field
    pub fn parent_column(&self, field: &str) -> String {
        format!("{}{}", self.parent_prefix, field)
    }
}

/// Complete description of the tables extracted from every document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableConfig {
    pub record_path: RecordPath,
    pub table_name: String,
    pub columns: ColumnMap,

    /// Absent in the file means no nested tables
    #[serde(default)]
    pub nested_tables: Vec<NestedTableConfig>,
}

impl TableConfig {
    /// Read and parse a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a configuration held in memory
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Names of every table this configuration produces, root first
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.table_name.as_str())
            .chain(self.nested_tables.iter().map(|n| n.table_name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "record_path": "value",
        "table_name": "user_data",
        "columns": {
            "id": "id",
            "mail": "email_address",
            "signInActivity.lastSignInDateTime": "last_signin"
        },
        "nested_tables": []
    }"#;

    #[test]
    fn test_parse_sample_config() {
        let config = TableConfig::from_json_str(SAMPLE).unwrap();

        assert_eq!(config.table_name, "user_data");
        assert_eq!(config.record_path, RecordPath::Key("value".to_string()));
        assert!(config.nested_tables.is_empty());

        let keys: Vec<_> = config.columns.source_keys().collect();
        assert_eq!(keys, vec!["id", "mail", "signInActivity.lastSignInDateTime"]);
        let names: Vec<_> = config.columns.output_names().collect();
        assert_eq!(names, vec!["id", "email_address", "last_signin"]);
    }

    #[test]
    fn test_column_order_follows_declaration() {
        let config = TableConfig::from_json_str(
            r#"{"record_path": "v", "table_name": "t", "columns": {"z": "a", "a": "z", "m": "m"}}"#,
        )
        .unwrap();

        let keys: Vec<_> = config.columns.source_keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_repeated_column_keeps_first_position() {
        let config = TableConfig::from_json_str(
            r#"{"record_path": "v", "table_name": "t", "columns": {"a": "first", "b": "b", "a": "last"}}"#,
        )
        .unwrap();

        let pairs: Vec<_> = config.columns.iter().collect();
        assert_eq!(pairs, vec![("a", "last"), ("b", "b")]);
    }

    #[test]
    fn test_nested_tables_default_to_empty() {
        let config =
            TableConfig::from_json_str(r#"{"record_path": "v", "table_name": "t", "columns": {}}"#)
                .unwrap();
        assert!(config.nested_tables.is_empty());
        assert!(config.columns.is_empty());
    }

    #[test]
    fn test_nested_table_fields() {
        let config = TableConfig::from_json_str(
            r#"{
                "record_path": ["data", "users"],
                "table_name": "users",
                "columns": {"id": "user_id"},
                "nested_tables": [
                    {"table_name": "groups", "record_path": "groups", "parent_id": ["id", "tenant"],
                     "parent_prefix": "user_"},
                    {"table_name": "phones", "record_path": "phones", "parent_id": "id",
                     "columns": {"number": "phone"}}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.record_path.segments(), ["data", "users"]);
        assert_eq!(config.record_path.to_string(), "data.users");

        let groups = &config.nested_tables[0];
        assert_eq!(groups.parent_id.fields(), ["id", "tenant"]);
        assert_eq!(groups.parent_column("id"), "user_id");
        assert!(groups.columns.is_none());

        let phones = &config.nested_tables[1];
        assert_eq!(phones.parent_id.fields(), ["id"]);
        assert_eq!(phones.parent_column("id"), "id");
        assert_eq!(phones.columns.as_ref().unwrap().len(), 1);

        let names: Vec<_> = config.table_names().collect();
        assert_eq!(names, vec!["users", "groups", "phones"]);
    }

    #[test]
    fn test_missing_required_key_is_rejected() {
        let err = TableConfig::from_json_str(r#"{"record_path": "v", "table_name": "t"}"#)
            .unwrap_err();
        assert!(err.to_string().contains("columns"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = TableConfig::load(file.path()).unwrap();
        assert_eq!(config.table_name, "user_data");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TableConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = TableConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
