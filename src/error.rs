//! Error types used by the task registry and task execution.
//!
//! This module defines the two error kinds of the crate:
//!
//! - [`RegistryError`] — programmer errors raised by registry misuse
//!   (resolving an unregistered name, registering a nameless task). These
//!   propagate as `Err` out of [`process`](crate::Task::process) and
//!   [`apply`](crate::apply) instead of being captured into task state.
//! - [`TaskError`] — the recorded failure of a task run: a `{code, message}`
//!   pair, always normalized (missing code defaults to `0`, missing message
//!   to the empty string). Handler faults and explicit failures both end up
//!   in this shape.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// # Errors produced by registry misuse.
///
/// These represent mistakes in how the caller wires tasks together, not
/// failures of the data being processed. They are intentionally never
/// converted into a [`TaskError`]: a chain that references a task nobody
/// registered is broken code, not bad input.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A task name was resolved through the registry but nothing is stored
    /// under it.
    #[error("create an unregistered task: {0}")]
    Unregistered(String),

    /// A task instance was registered under its own name, but its name is
    /// empty.
    #[error("task name is unknown")]
    UnnamedTask,
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskpipe::RegistryError;
    ///
    /// let err = RegistryError::Unregistered("missing".into());
    /// assert_eq!(err.as_label(), "registry_unregistered");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::Unregistered(_) => "registry_unregistered",
            RegistryError::UnnamedTask => "registry_unnamed_task",
        }
    }
}

/// # Recorded failure of a task run.
///
/// A normalized `{code, message}` pair. Two paths produce it:
///
/// - a handler function returns `Err(TaskError)` (the fault channel), which
///   the dispatch site converts into stored state;
/// - a handler calls
///   [`set_process_error`](crate::Task::set_process_error) directly.
///
/// `code` defaults to `0`; most failures only carry a message.
///
/// # Example
/// ```
/// use taskpipe::TaskError;
///
/// let err = TaskError::new("Data must be a string");
/// assert_eq!(err.code, 0);
///
/// let err = TaskError::with_code("upstream rejected", 502);
/// assert_eq!(err.code, 502);
/// assert_eq!(err.to_string(), "upstream rejected");
/// ```
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct TaskError {
    /// Numeric error code; `0` when the failure carries none.
    pub code: i64,
    /// Human-readable failure message.
    pub message: String,
}

impl TaskError {
    /// Creates an error with the given message and code `0`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
        }
    }

    /// Creates an error with an explicit numeric code.
    pub fn with_code(message: impl Into<String>, code: i64) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&str> for TaskError {
    fn from(message: &str) -> Self {
        TaskError::new(message)
    }
}

impl From<String> for TaskError {
    fn from(message: String) -> Self {
        TaskError::new(message)
    }
}

impl From<(&str, i64)> for TaskError {
    fn from((message, code): (&str, i64)) -> Self {
        TaskError::with_code(message, code)
    }
}

impl From<(String, i64)> for TaskError {
    fn from((message, code): (String, i64)) -> Self {
        TaskError::with_code(message, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_defaults() {
        let err = TaskError::default();
        assert_eq!(err.code, 0);
        assert_eq!(err.message, "");
    }

    #[test]
    fn test_task_error_from_message() {
        let err: TaskError = "boom".into();
        assert_eq!(err, TaskError::new("boom"));
        assert_eq!(err.code, 0);
    }

    #[test]
    fn test_task_error_from_pair() {
        let err: TaskError = ("not found", 404).into();
        assert_eq!(err.code, 404);
        assert_eq!(err.message, "not found");
    }

    #[test]
    fn test_task_error_serializes_to_code_and_message() {
        let err = TaskError::with_code("nope", 7);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({"code": 7, "message": "nope"}));
    }

    #[test]
    fn test_registry_error_labels() {
        assert_eq!(
            RegistryError::Unregistered("x".into()).as_label(),
            "registry_unregistered"
        );
        assert_eq!(RegistryError::UnnamedTask.as_label(), "registry_unnamed_task");
    }

    #[test]
    fn test_registry_error_display_includes_name() {
        let err = RegistryError::Unregistered("etl".into());
        assert_eq!(err.to_string(), "create an unregistered task: etl");
    }
}
