//! # Built-in `DataSource` task.
//!
//! `DataSource` extracts one value out of a response object by the `path`
//! option (a dotted string or a numeric index) — the canonical "pick a field
//! out of an ajax payload" step of a chain. It is pre-registered in every
//! [`Registry`] with default options `{"path": ""}`.
//!
//! ## Failure taxonomy
//! - `path` is neither string nor number → fault `"Path must be string or number"`
//! - `path` is an empty string → fault `"Path is empty"`
//! - response is not a container → explicit failure `"Response must be an object"`
//! - nothing at `path` → explicit failure `"Ajax result path not found"`
//!
//! ## Example
//! ```
//! use serde_json::json;
//! use taskpipe::Registry;
//!
//! let registry = Registry::new();
//! let mut task = registry
//!     .factory_with("DataSource", &json!({"path": "rows.0.name"}))
//!     .unwrap();
//!
//! let response = json!({"rows": [{"name": "first"}]});
//! assert!(task.process_in(&registry, &response).unwrap());
//! assert_eq!(task.result(), Some(&json!("first")));
//! ```

use serde_json::{Value, json};

use crate::error::TaskError;
use crate::paths::get_path;
use crate::registry::Registry;
use crate::tasks::{Handler, Task};

/// Installs the built-in tasks; called by `Registry::new`.
pub(crate) fn register_builtins(registry: &Registry) {
    registry.register_with("DataSource", Handler::func(data_source), json!({"path": ""}));
}

fn data_source(response: &Value, task: &mut Task) -> Result<(), TaskError> {
    // Path option problems are faults; response problems are explicit
    // failures.
    let path = match task.option_value("path") {
        Some(Value::String(s)) => {
            if s.is_empty() {
                return Err(TaskError::new("Path is empty"));
            }
            s.clone()
        }
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(TaskError::new("Path must be string or number")),
    };

    if !(response.is_object() || response.is_array()) {
        task.set_process_error("Response must be an object");
        return Ok(());
    }

    match get_path(response, &path) {
        Some(value) => task.set_process_result(value.clone()),
        None => task.set_process_error("Ajax result path not found"),
    }
    Ok(())
}
