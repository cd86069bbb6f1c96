//! # Dotted-path access into JSON values.
//!
//! Task options and the built-in `DataSource` task address nested values by
//! dotted path (`"a.b.c"`). [`set_path`] writes at a nested path, creating
//! intermediate objects as needed; [`get_path`] reads one, indexing arrays
//! when a segment parses as a number.
//!
//! # Example
//! ```
//! use serde_json::json;
//! use taskpipe::paths::{get_path, set_path};
//!
//! let mut options = json!({});
//! set_path(&mut options, "retry.limit", json!(3));
//! assert_eq!(options, json!({"retry": {"limit": 3}}));
//!
//! let data = json!({"items": [{"id": 7}]});
//! assert_eq!(get_path(&data, "items.0.id"), Some(&json!(7)));
//! ```

use serde_json::{Map, Value};

/// Reads the value at `path`, splitting on `.`.
///
/// Object segments are looked up as keys; array segments must parse as a
/// `usize` index. Returns `None` as soon as a segment cannot be resolved.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, splitting on `.`.
///
/// Intermediate containers are created as objects; a non-object value in the
/// way is replaced. The final segment always overwrites.
pub fn set_path(target: &mut Value, path: &str, value: Value) {
    let mut current = target;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(map) = current else {
            return;
        };
        if segments.peek().is_none() {
            map.insert(segment.to_owned(), value);
            return;
        }
        current = map.entry(segment.to_owned()).or_insert(Value::Null);
    }
}
