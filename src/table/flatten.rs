use crate::table::types::Record;
use serde_json::{Map, Value};

/// Separator between the segments of a flattened field path
pub const PATH_SEPARATOR: &str = ".";

/// Column used when a record array holds scalars instead of objects
pub const SCALAR_COLUMN: &str = "0";

/// Flatten one element of a record array into a single-level record
///
/// Nested objects are expanded into dotted keys (`a.b.c`). Arrays, scalars
/// and nulls are kept as opaque leaf values; an empty object contributes no
/// keys at all.
pub fn flatten_record(value: Value) -> Record {
    match value {
        Value::Object(obj) => {
            let mut record = Map::new();
            flatten_object(obj, None, &mut record);
            record
        }
        other => {
            let mut record = Map::new();
            record.insert(SCALAR_COLUMN.to_string(), other);
            record
        }
    }
}

fn flatten_object(obj: Map<String, Value>, prefix: Option<&str>, out: &mut Record) {
    for (key, value) in obj.into_iter() {
        let path = match prefix {
            Some(p) => format!("{}{}{}", p, PATH_SEPARATOR, key),
            None => key,
        };

        match value {
            Value::Object(nested) => flatten_object(nested, Some(&path), out),
            leaf => {
                out.insert(path, leaf);
            }
        }
    }
}

/// Short name of a JSON value's kind, for error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_object_unchanged() {
        let record = flatten_record(json!({"id": 1, "name": "Alice"}));

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name").unwrap(), "Alice");
    }

    #[test]
    fn test_nested_objects_become_dotted_keys() {
        let record = flatten_record(json!({
            "id": "user1",
            "signInActivity": {
                "lastSignInDateTime": "2023-01-01T10:00:00Z",
                "device": {"os": "linux"}
            }
        }));

        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "signInActivity.lastSignInDateTime", "signInActivity.device.os"]
        );
        assert_eq!(
            record.get("signInActivity.lastSignInDateTime").unwrap(),
            "2023-01-01T10:00:00Z"
        );
    }

    #[test]
    fn test_arrays_stay_opaque() {
        let record = flatten_record(json!({
            "tags": ["a", "b"],
            "groups": [{"id": 1}, {"id": 2}],
            "meta": {"aliases": []}
        }));

        assert_eq!(record.get("tags").unwrap(), &json!(["a", "b"]));
        assert_eq!(record.get("groups").unwrap(), &json!([{"id": 1}, {"id": 2}]));
        assert_eq!(record.get("meta.aliases").unwrap(), &json!([]));
    }

    #[test]
    fn test_null_and_empty_object() {
        let record = flatten_record(json!({"a": null, "b": {}, "c": {"d": null}}));

        assert_eq!(record.get("a"), Some(&Value::Null));
        assert!(!record.contains_key("b"));
        assert_eq!(record.get("c.d"), Some(&Value::Null));
    }

    #[test]
    fn test_scalar_element() {
        let record = flatten_record(json!("rust"));

        assert_eq!(record.len(), 1);
        assert_eq!(record.get(SCALAR_COLUMN).unwrap(), "rust");
    }
}
