//! # Chain orchestration over one input value.
//!
//! [`apply`] runs one or more tasks over a single input: each entry is
//! resolved to a live [`Task`], tasks execute strictly in order against a
//! deep copy of the running data, a success replaces the running data with
//! the task's result, and the first failure stops the chain. The outcome is
//! an [`ApplyOutcome`] carrying exactly one of `data` or `error`.
//!
//! Entries are anything [`TaskSpec`]-convertible: a registered name, a
//! `(name, options)` pair, a live task, or a `(task, options)` pair.
//!
//! ## Example
//! ```
//! use serde_json::{Value, json};
//! use taskpipe::{apply, Handler, Registry, Task};
//!
//! Registry::global().register("shout", Handler::func(|data: &Value, task: &mut Task| {
//!     match data.as_str() {
//!         Some(s) => task.set_process_result(json!(s.to_uppercase())),
//!         None => task.set_process_error("Data must be a string"),
//!     }
//!     Ok(())
//! }));
//!
//! let outcome = apply(&json!("hello"), ["shout"]).unwrap();
//! assert_eq!(outcome.data(), Some(&json!("HELLO")));
//!
//! let outcome = apply(&json!(5), ["shout"]).unwrap();
//! assert!(outcome.error().is_some());
//! assert_eq!(outcome.data(), None);
//! ```

use serde::Serialize;
use serde_json::Value;

use crate::error::{RegistryError, TaskError};
use crate::registry::Registry;
use crate::tasks::Task;

/// One entry of an [`apply`] chain, before resolution.
#[derive(Debug, Clone)]
pub enum TaskSpec {
    /// A registered name, resolved through the registry.
    Named(String),
    /// A registered name plus option overrides merged on top of the stored
    /// defaults.
    NamedWith {
        /// Registered task name.
        task: String,
        /// Dotted path → value overrides.
        options: Value,
    },
    /// An already-built task, used as-is.
    Instance(Task),
    /// An already-built task with options merged on top.
    InstanceWith {
        /// The task to run.
        task: Task,
        /// Dotted path → value overrides.
        options: Value,
    },
}

impl TaskSpec {
    fn resolve(self, registry: &Registry) -> Result<Task, RegistryError> {
        match self {
            TaskSpec::Named(name) => registry.factory(&name),
            TaskSpec::NamedWith { task, options } => registry.factory_with(&task, &options),
            TaskSpec::Instance(task) => Ok(task),
            TaskSpec::InstanceWith { mut task, options } => {
                task.merge_options(&options);
                Ok(task)
            }
        }
    }
}

impl From<&str> for TaskSpec {
    fn from(name: &str) -> Self {
        TaskSpec::Named(name.to_owned())
    }
}

impl From<String> for TaskSpec {
    fn from(name: String) -> Self {
        TaskSpec::Named(name)
    }
}

impl From<Task> for TaskSpec {
    fn from(task: Task) -> Self {
        TaskSpec::Instance(task)
    }
}

impl From<(&str, Value)> for TaskSpec {
    fn from((task, options): (&str, Value)) -> Self {
        TaskSpec::NamedWith {
            task: task.to_owned(),
            options,
        }
    }
}

impl From<(String, Value)> for TaskSpec {
    fn from((task, options): (String, Value)) -> Self {
        TaskSpec::NamedWith { task, options }
    }
}

impl From<(Task, Value)> for TaskSpec {
    fn from((task, options): (Task, Value)) -> Self {
        TaskSpec::InstanceWith { task, options }
    }
}

/// Final state of an [`apply`] chain: either the threaded-through data or
/// the first failure. Exactly one of the two, also after serialization
/// (`{"data": ...}` or `{"error": {"code", "message"}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApplyOutcome {
    /// Every task succeeded; `data` is the last task's result (or a copy of
    /// the input when the chain was empty).
    Success {
        /// The threaded-through data.
        data: Value,
    },
    /// A task failed; the chain stopped there and `data` is gone.
    Failure {
        /// The failing task's recorded error.
        error: TaskError,
    },
}

impl ApplyOutcome {
    /// True iff the whole chain succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, ApplyOutcome::Success { .. })
    }

    /// The final data on success, `None` on failure.
    pub fn data(&self) -> Option<&Value> {
        match self {
            ApplyOutcome::Success { data } => Some(data),
            ApplyOutcome::Failure { .. } => None,
        }
    }

    /// The first failure, `None` on success.
    pub fn error(&self) -> Option<&TaskError> {
        match self {
            ApplyOutcome::Success { .. } => None,
            ApplyOutcome::Failure { error } => Some(error),
        }
    }

    /// Consumes the outcome, yielding the final data on success.
    pub fn into_data(self) -> Option<Value> {
        match self {
            ApplyOutcome::Success { data } => Some(data),
            ApplyOutcome::Failure { .. } => None,
        }
    }
}

/// Runs `tasks` over `data` through the process-wide [`Registry::global`].
///
/// See [`apply_in`] for the algorithm and error contract.
pub fn apply<I, S>(data: &Value, tasks: I) -> Result<ApplyOutcome, RegistryError>
where
    I: IntoIterator<Item = S>,
    S: Into<TaskSpec>,
{
    apply_in(Registry::global(), data, tasks)
}

/// Runs `tasks` over `data`, resolving names through `registry`.
///
/// All entries are resolved to live tasks before anything runs, so a bad
/// name fails the whole call up front. Each task then processes a deep copy
/// of the running data; a success replaces the running data with the task's
/// result, the first failure produces [`ApplyOutcome::Failure`] and skips
/// the remaining tasks.
///
/// Registry misuse ([`RegistryError::Unregistered`]) propagates as `Err`;
/// data-processing failures are part of the [`ApplyOutcome`].
pub fn apply_in<I, S>(registry: &Registry, data: &Value, tasks: I) -> Result<ApplyOutcome, RegistryError>
where
    I: IntoIterator<Item = S>,
    S: Into<TaskSpec>,
{
    let mut running = data.clone();

    let mut resolved = Vec::new();
    for spec in tasks {
        resolved.push(spec.into().resolve(registry)?);
    }

    for mut task in resolved {
        let input = running.clone();
        if task.process_in(registry, &input)? {
            running = task.result().cloned().unwrap_or(Value::Null);
        } else {
            let error = task.error().cloned().unwrap_or_default();
            tracing::debug!(
                task = %task.name(),
                code = error.code,
                message = %error.message,
                "apply chain stopped at first failure"
            );
            return Ok(ApplyOutcome::Failure { error });
        }
    }

    Ok(ApplyOutcome::Success { data: running })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::Handler;
    use serde_json::json;

    fn append_registry() -> Registry {
        let registry = Registry::new();
        registry.register(
            "append",
            Handler::func(|data, task| {
                match data.as_str() {
                    Some(s) => task.set_process_result(json!(format!("{s}_"))),
                    None => task.set_process_error("Data must be a string"),
                }
                Ok(())
            }),
        );
        registry
    }

    #[test]
    fn test_apply_success_shape() {
        let registry = append_registry();
        let outcome = apply_in(&registry, &json!("123"), ["append"]).unwrap();
        assert!(outcome.is_success());
        assert_eq!(outcome.data(), Some(&json!("123_")));
        assert_eq!(outcome.error(), None);
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"data": "123_"})
        );
    }

    #[test]
    fn test_apply_failure_shape_has_no_data() {
        let registry = append_registry();
        let outcome = apply_in(&registry, &json!(123), ["append"]).unwrap();
        assert!(!outcome.is_success());
        assert_eq!(outcome.data(), None);
        assert_eq!(
            outcome.error(),
            Some(&TaskError::new("Data must be a string"))
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": {"code": 0, "message": "Data must be a string"}})
        );
    }

    #[test]
    fn test_apply_threads_results_in_order() {
        let registry = append_registry();
        let outcome = apply_in(&registry, &json!("123"), ["append", "append"]).unwrap();
        assert_eq!(outcome.into_data(), Some(json!("123__")));
    }

    #[test]
    fn test_apply_skips_tasks_after_first_failure() {
        let registry = append_registry();
        registry.register(
            "reject",
            Handler::func(|_, task| {
                task.set_process_error(("always rejected", 40));
                Ok(())
            }),
        );
        // append would succeed on a string; reject fires first.
        let outcome = apply_in(&registry, &json!("ok"), ["reject", "append"]).unwrap();
        assert_eq!(
            outcome.error(),
            Some(&TaskError::with_code("always rejected", 40))
        );
    }

    #[test]
    fn test_apply_empty_chain_copies_input() {
        let registry = Registry::new();
        let data = json!({"keep": "me"});
        let outcome = apply_in(&registry, &data, std::iter::empty::<&str>()).unwrap();
        assert_eq!(outcome.data(), Some(&data));
    }

    #[test]
    fn test_apply_unknown_name_is_a_programmer_error() {
        let registry = Registry::new();
        let err = apply_in(&registry, &json!(1), ["who"]).unwrap_err();
        assert_eq!(err, RegistryError::Unregistered("who".into()));
    }

    #[test]
    fn test_apply_spec_with_options() {
        let registry = Registry::new();
        let outcome = apply_in(
            &registry,
            &json!({"rows": ["first", "second"]}),
            [("DataSource", json!({"path": "rows.1"}))],
        )
        .unwrap();
        assert_eq!(outcome.data(), Some(&json!("second")));
    }

    #[test]
    fn test_apply_accepts_task_instances() {
        let registry = Registry::new();
        let doubler = Task::new(Handler::func(|data, task| {
            let n = data.as_i64().unwrap_or(0);
            task.set_process_result(json!(n * 2));
            Ok(())
        }));
        let outcome = apply_in(&registry, &json!(4), [TaskSpec::from(doubler)]).unwrap();
        assert_eq!(outcome.data(), Some(&json!(8)));
    }

    #[test]
    fn test_apply_instance_with_options_merges_on_top() {
        let registry = Registry::new();
        let picker = registry.factory("DataSource").unwrap();
        let outcome = apply_in(
            &registry,
            &json!({"user": {"id": 9}}),
            [TaskSpec::from((picker, json!({"path": "user.id"})))],
        )
        .unwrap();
        assert_eq!(outcome.data(), Some(&json!(9)));
    }
}
