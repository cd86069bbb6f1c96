//! # Task instance: a handler bound to result/error state.
//!
//! A [`Task`] wraps one [`Handler`] together with its options and the
//! outcome of its last run. [`Task::process`] deep-copies the input, runs
//! the handler shape, and records either a result or a
//! [`TaskError`] — never both.
//!
//! ## Result threading
//! Sequence and keyed handlers thread a *running* result forward: each step
//! receives the previous step's output, not the original input, and the
//! chain stops at the first failing step. A plain function handler only ever
//! sees the task's own original input.
//!
//! ## Example
//! ```
//! use serde_json::{Value, json};
//! use taskpipe::{Handler, Registry, Task};
//!
//! let registry = Registry::new();
//! registry.register("append", Handler::func(|data: &Value, task: &mut Task| {
//!     match data.as_str() {
//!         Some(s) => task.set_process_result(json!(format!("{s}_"))),
//!         None => task.set_process_error("Data must be a string"),
//!     }
//!     Ok(())
//! }));
//! registry.register("append_twice", Handler::sequence(["append", "append"]));
//!
//! let mut task = registry.factory("append_twice").unwrap();
//! assert!(task.process_in(&registry, &json!("123")).unwrap());
//! assert_eq!(task.result(), Some(&json!("123__")));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use serde_json::Value;

use crate::error::{RegistryError, TaskError};
use crate::paths::{get_path, set_path};
use crate::registry::Registry;
use crate::tasks::handler::{Handler, Step};

/// Global counter for task ids (generation order).
static TASK_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_task_id() -> u64 {
    TASK_SEQ.fetch_add(1, AtomicOrdering::Relaxed)
}

/// A unit of work: one handler plus options and the outcome of the last run.
///
/// Identity is a process-unique id (opaque, debug/equality only) and an
/// optional registered name (empty for ad hoc tasks). The result and error
/// slots are mutually exclusive; setting one clears the other.
#[derive(Debug)]
pub struct Task {
    id: u64,
    name: String,
    options: Value,
    handler: Option<Handler>,
    result: Option<Value>,
    error: Option<TaskError>,
}

impl Default for Task {
    /// A task with no handler: processing any input succeeds and passes a
    /// deep copy of the input through as the result.
    fn default() -> Self {
        Self {
            id: next_task_id(),
            name: String::new(),
            options: Value::Object(serde_json::Map::new()),
            handler: None,
            result: None,
            error: None,
        }
    }
}

impl Clone for Task {
    /// Clones the blueprint parts (name, options, handler) under a fresh id
    /// with cleared result/error state, so ids stay process-unique and no
    /// transient state leaks through registry blueprints.
    fn clone(&self) -> Self {
        Self {
            id: next_task_id(),
            name: self.name.clone(),
            options: self.options.clone(),
            handler: self.handler.clone(),
            result: None,
            error: None,
        }
    }
}

impl Task {
    /// Creates a task around any handler-convertible value: a [`Handler`],
    /// a registered name (`&str`), or another [`Task`].
    pub fn new(handler: impl Into<Handler>) -> Self {
        Self {
            handler: Some(handler.into()),
            ..Self::default()
        }
    }

    /// Process-unique id, assigned in generation order.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Registered name; empty for ad hoc tasks.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task with its name set. Names are assigned at build time
    /// (by the factory or this builder) and never change across processing.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns the task with its options replaced wholesale.
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Builder form of [`Task::option`].
    pub fn with_option(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.option(path, value);
        self
    }

    /// Current options object.
    pub fn options(&self) -> &Value {
        &self.options
    }

    /// Reads one option by dotted path.
    pub fn option_value(&self, path: &str) -> Option<&Value> {
        get_path(&self.options, path)
    }

    /// Sets one option by dotted path, creating intermediate objects as
    /// needed. Chainable.
    ///
    /// ## Example
    /// ```
    /// use serde_json::json;
    /// use taskpipe::Task;
    ///
    /// let mut task = Task::default();
    /// task.option("source.path", "rows").option("limit", 5);
    /// assert_eq!(task.options(), &json!({"source": {"path": "rows"}, "limit": 5}));
    /// ```
    pub fn option(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        set_path(&mut self.options, path, value.into());
        self
    }

    /// Merges an object of dotted-path → value pairs into the options.
    /// Non-object input is ignored. Chainable.
    pub fn merge_options(&mut self, map: &Value) -> &mut Self {
        if let Some(entries) = map.as_object() {
            for (path, value) in entries {
                set_path(&mut self.options, path, value.clone());
            }
        }
        self
    }

    /// Current handler, if any. `None` while a handler function is being
    /// invoked (the handler is detached for the duration of dispatch).
    pub fn handler(&self) -> Option<&Handler> {
        self.handler.as_ref()
    }

    /// Replaces the handler.
    pub fn set_handler(&mut self, handler: impl Into<Handler>) {
        self.handler = Some(handler.into());
    }

    /// True iff the last run recorded an error.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Error recorded by the last run, if any. Always a fully normalized
    /// `{code, message}` pair.
    pub fn error(&self) -> Option<&TaskError> {
        self.error.as_ref()
    }

    /// Result of the last successful run; `None` after a failure.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Records a successful result and clears any error.
    ///
    /// Handler functions call this to signal success.
    pub fn set_process_result(&mut self, result: Value) {
        self.result = Some(result);
        self.error = None;
    }

    /// Records a failure and clears any result.
    ///
    /// Accepts anything [`TaskError`]-convertible: a message (`code` 0) or a
    /// `(message, code)` pair.
    pub fn set_process_error(&mut self, error: impl Into<TaskError>) {
        self.result = None;
        self.error = Some(error.into());
    }

    /// Processes `data` through the process-wide [`Registry::global`].
    ///
    /// See [`Task::process_in`] for the algorithm and error contract.
    pub fn process(&mut self, data: &Value) -> Result<bool, RegistryError> {
        self.process_in(Registry::global(), data)
    }

    /// Processes `data` against this task's handler, resolving named steps
    /// through `registry`.
    ///
    /// The input is deep-copied into the result slot up front, so a task
    /// with no handler succeeds and passes the input through. Dispatch by
    /// handler shape:
    ///
    /// - **Func**: invoked with the original input; an `Err` return is the
    ///   fault channel and is converted into stored error state here — the
    ///   single conversion site.
    /// - **Sub**: the nested task runs on the current running result; its
    ///   result/error are copied into this task.
    /// - **Sequence** / **Keyed**: entries run in order against the running
    ///   result, each copying its outcome into this task; the first error
    ///   stops the chain and later entries never execute.
    ///
    /// Returns `Ok(true)` on success, `Ok(false)` when the run recorded a
    /// [`TaskError`]. Registry misuse (an unregistered step name) is a
    /// programmer error and propagates as `Err` instead of being captured.
    pub fn process_in(&mut self, registry: &Registry, data: &Value) -> Result<bool, RegistryError> {
        tracing::trace!(id = self.id, name = %self.name, "processing task");
        self.result = Some(data.clone());
        self.error = None;

        let Some(mut handler) = self.handler.take() else {
            return Ok(true);
        };
        let dispatched = self.dispatch(&mut handler, registry, data);
        self.handler = Some(handler);
        dispatched?;

        Ok(!self.is_error())
    }

    fn dispatch(
        &mut self,
        handler: &mut Handler,
        registry: &Registry,
        data: &Value,
    ) -> Result<(), RegistryError> {
        match handler {
            Handler::Func(f) => {
                if let Err(fault) = f(data, self) {
                    self.set_process_error(fault);
                }
                Ok(())
            }
            Handler::Sub(sub) => self.run_step(registry, sub),
            Handler::Sequence(steps) => {
                for step in steps.iter() {
                    let mut instance = match step {
                        Step::Named(name) => registry.factory(name)?,
                        Step::Inline(inline) => Task::new(inline.clone()),
                    };
                    self.run_step(registry, &mut instance)?;
                    if self.is_error() {
                        tracing::debug!(
                            id = self.id,
                            name = %self.name,
                            step = %instance.describe(),
                            "sequence short-circuited"
                        );
                        break;
                    }
                }
                Ok(())
            }
            Handler::Keyed(entries) => {
                for (name, options) in entries.iter() {
                    let mut instance = registry.factory(name)?;
                    if options.as_object().is_some_and(|map| !map.is_empty()) {
                        instance.merge_options(options);
                    }
                    self.run_step(registry, &mut instance)?;
                    if self.is_error() {
                        tracing::debug!(
                            id = self.id,
                            name = %self.name,
                            step = %name,
                            "keyed sequence short-circuited"
                        );
                        break;
                    }
                }
                Ok(())
            }
        }
    }

    /// Runs one step task on the current running result and copies its
    /// outcome into this task.
    fn run_step(&mut self, registry: &Registry, step: &mut Task) -> Result<(), RegistryError> {
        let input = self.result.take().unwrap_or(Value::Null);
        step.process_in(registry, &input)?;
        self.result = step.result().cloned();
        self.error = step.error().cloned();
        Ok(())
    }

    fn describe(&self) -> String {
        if self.name.is_empty() {
            format!("task#{}", self.id)
        } else {
            self.name.clone()
        }
    }
}
