//! # Task registry - name-keyed blueprint store.
//!
//! A [`Registry`] maps task names to stored blueprints (handler + default
//! options) and builds live [`Task`] instances from them on demand:
//!
//! - [`Registry::register`] stores or overwrites a blueprint (last write
//!   wins);
//! - [`Registry::factory`] builds a fresh task from a blueprint, deep-copying
//!   the stored options so instances can never mutate the template;
//! - [`Registry::global`] is the process-wide default used by
//!   [`Task::process`] and [`apply`](crate::apply) when no registry is
//!   injected explicitly.
//!
//! Every new registry comes with the built-in `DataSource` task installed.
//!
//! ## Rules
//! - Entries are guarded by an `RwLock`: registration may race with lookup.
//! - Registry misuse (unregistered name, nameless task) surfaces as
//!   [`RegistryError`], never as recorded task state.
//!
//! ## Example
//! ```
//! use serde_json::{Value, json};
//! use taskpipe::{Handler, Registry, Task};
//!
//! let registry = Registry::new();
//! registry.register("double", Handler::func(|data: &Value, task: &mut Task| {
//!     let n = data.as_i64().unwrap_or(0);
//!     task.set_process_result(json!(n * 2));
//!     Ok(())
//! }));
//!
//! assert!(registry.is_registered("double"));
//! let mut task = registry.factory("double").unwrap();
//! assert!(task.process_in(&registry, &json!(21)).unwrap());
//! assert_eq!(task.result(), Some(&json!(42)));
//! ```

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::datasource;
use crate::error::RegistryError;
use crate::tasks::{Handler, Task};

/// Process-wide default registry.
static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Stored blueprint: handler plus default options.
struct Blueprint {
    handler: Handler,
    options: Value,
}

/// Name-keyed store of task blueprints.
pub struct Registry {
    entries: RwLock<HashMap<String, Blueprint>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry with the built-in tasks installed.
    pub fn new() -> Self {
        let registry = Self {
            entries: RwLock::new(HashMap::new()),
        };
        datasource::register_builtins(&registry);
        registry
    }

    /// Returns the process-wide registry, creating it on first use.
    ///
    /// Injected registries (`Registry::new`) behave identically; the global
    /// one only exists for the ergonomics of `Task::process` and `apply`.
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Registry::new)
    }

    /// True iff a blueprint is stored under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Returns all registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Stores a blueprint under `name` with empty default options.
    ///
    /// Overwrites any existing entry: last write wins.
    pub fn register(&self, name: impl Into<String>, handler: impl Into<Handler>) {
        self.register_with(name, handler, Value::Object(Map::new()));
    }

    /// Stores a blueprint under `name` with default options.
    pub fn register_with(
        &self,
        name: impl Into<String>,
        handler: impl Into<Handler>,
        options: Value,
    ) {
        let name = name.into();
        tracing::debug!(task = %name, "registering task blueprint");
        self.write().insert(
            name,
            Blueprint {
                handler: handler.into(),
                options,
            },
        );
    }

    /// Registers a task instance under its own name, storing the instance as
    /// a nested-task handler.
    ///
    /// Fails with [`RegistryError::UnnamedTask`] when the task has no name.
    pub fn register_task(&self, task: &Task, options: Value) -> Result<(), RegistryError> {
        if task.name().is_empty() {
            return Err(RegistryError::UnnamedTask);
        }
        self.register_with(task.name().to_owned(), task.clone(), options);
        Ok(())
    }

    /// Builds a fresh [`Task`] from the blueprint stored under `name`.
    ///
    /// The new task gets the registered name, a clone of the stored handler,
    /// and a deep copy of the stored options — instances never share the
    /// template's options object.
    ///
    /// Fails with [`RegistryError::Unregistered`] for unknown names.
    pub fn factory(&self, name: &str) -> Result<Task, RegistryError> {
        let entries = self.read();
        let blueprint = entries
            .get(name)
            .ok_or_else(|| RegistryError::Unregistered(name.to_owned()))?;
        tracing::trace!(task = %name, "building task from blueprint");
        Ok(Task::new(blueprint.handler.clone())
            .with_name(name)
            .with_options(blueprint.options.clone()))
    }

    /// Like [`Registry::factory`], merging `overrides` (an object of dotted
    /// path → value pairs) on top of the stored options.
    pub fn factory_with(&self, name: &str, overrides: &Value) -> Result<Task, RegistryError> {
        let mut task = self.factory(name)?;
        task.merge_options(overrides);
        Ok(task)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Blueprint>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Blueprint>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
