//! # Handler shapes a task can execute.
//!
//! [`Handler`] is a closed variant over the four things a task may run:
//! a plain function, a nested task, an ordered sequence of steps, or a keyed
//! sequence of registered names with per-entry options. The shape is resolved
//! once at dispatch time in [`Task::process`](crate::Task::process) rather
//! than re-inspected per call.
//!
//! ## Example
//! ```
//! use serde_json::{Value, json};
//! use taskpipe::{Handler, Task};
//!
//! let append = Handler::func(|data: &Value, task: &mut Task| {
//!     match data.as_str() {
//!         Some(s) => task.set_process_result(json!(format!("{s}_"))),
//!         None => task.set_process_error("Data must be a string"),
//!     }
//!     Ok(())
//! });
//!
//! let mut task = Task::new(append);
//! assert!(task.process(&json!("abc")).unwrap());
//! assert_eq!(task.result(), Some(&json!("abc_")));
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::TaskError;
use crate::tasks::task::Task;

/// Shared handle to a handler function.
///
/// The function receives the task's input and the task itself, signals
/// success/failure through
/// [`set_process_result`](Task::set_process_result) /
/// [`set_process_error`](Task::set_process_error), and may instead return
/// `Err(TaskError)` — the fault channel, converted into stored error state by
/// the dispatch site.
pub type HandlerFn = Arc<dyn Fn(&Value, &mut Task) -> Result<(), TaskError> + Send + Sync>;

/// What a task executes when processed.
#[derive(Clone)]
pub enum Handler {
    /// A plain function; sees the task's original input.
    Func(HandlerFn),
    /// A nested task; runs against the current running result.
    Sub(Box<Task>),
    /// Ordered steps, each a registered name or an inline handler. Steps
    /// thread the running result forward and stop at the first error.
    Sequence(Vec<Step>),
    /// Registered name → options entries, tried in insertion order with the
    /// same result-threading and short-circuit rules as [`Handler::Sequence`].
    Keyed(Vec<(String, Value)>),
}

/// One entry of a [`Handler::Sequence`].
#[derive(Clone)]
pub enum Step {
    /// Resolved through the registry at dispatch time.
    Named(String),
    /// Wrapped into an ad hoc task at dispatch time.
    Inline(Handler),
}

impl Handler {
    /// Wraps a closure as a [`Handler::Func`].
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&Value, &mut Task) -> Result<(), TaskError> + Send + Sync + 'static,
    {
        Handler::Func(Arc::new(f))
    }

    /// Builds an ordered sequence from anything step-convertible.
    ///
    /// ## Example
    /// ```
    /// use taskpipe::Handler;
    ///
    /// let chain = Handler::sequence(["normalize", "validate"]);
    /// assert!(matches!(chain, Handler::Sequence(ref steps) if steps.len() == 2));
    /// ```
    pub fn sequence<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        Handler::Sequence(steps.into_iter().map(Into::into).collect())
    }

    /// Builds a keyed sequence of registered names with per-entry options.
    ///
    /// Entries run in the order given here; a `Vec` of pairs is the backing
    /// store because `serde_json::Map` iterates keys sorted, which would
    /// silently reorder the chain.
    pub fn keyed<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, Value)>,
        N: Into<String>,
    {
        Handler::Keyed(
            entries
                .into_iter()
                .map(|(name, options)| (name.into(), options))
                .collect(),
        )
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Func"),
            Handler::Sub(task) => f.debug_tuple("Sub").field(task).finish(),
            Handler::Sequence(steps) => f.debug_tuple("Sequence").field(steps).finish(),
            Handler::Keyed(entries) => f.debug_tuple("Keyed").field(entries).finish(),
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Step::Inline(handler) => f.debug_tuple("Inline").field(handler).finish(),
        }
    }
}

// A bare name is a one-element sequence, matching the registry-name handler
// form of `register("alias", "other_task")`.
impl From<&str> for Handler {
    fn from(name: &str) -> Self {
        Handler::Sequence(vec![Step::Named(name.to_owned())])
    }
}

impl From<String> for Handler {
    fn from(name: String) -> Self {
        Handler::Sequence(vec![Step::Named(name)])
    }
}

impl From<Task> for Handler {
    fn from(task: Task) -> Self {
        Handler::Sub(Box::new(task))
    }
}

impl From<Vec<Step>> for Handler {
    fn from(steps: Vec<Step>) -> Self {
        Handler::Sequence(steps)
    }
}

impl From<&str> for Step {
    fn from(name: &str) -> Self {
        Step::Named(name.to_owned())
    }
}

impl From<String> for Step {
    fn from(name: String) -> Self {
        Step::Named(name)
    }
}

impl From<Handler> for Step {
    fn from(handler: Handler) -> Self {
        Step::Inline(handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_name_becomes_single_step_sequence() {
        let handler: Handler = "task_1".into();
        match handler {
            Handler::Sequence(steps) => {
                assert_eq!(steps.len(), 1);
                assert!(matches!(&steps[0], Step::Named(name) if name == "task_1"));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_sequence_builder_mixes_names_and_inline() {
        let inline = Handler::func(|_, task| {
            task.set_process_result(json!(null));
            Ok(())
        });
        let handler = Handler::sequence([Step::from("named"), Step::from(inline)]);
        match handler {
            Handler::Sequence(steps) => {
                assert!(matches!(&steps[0], Step::Named(_)));
                assert!(matches!(&steps[1], Step::Inline(_)));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_keyed_preserves_insertion_order() {
        let handler = Handler::keyed([("zulu", json!({})), ("alpha", json!({"k": 1}))]);
        match handler {
            Handler::Keyed(entries) => {
                assert_eq!(entries[0].0, "zulu");
                assert_eq!(entries[1].0, "alpha");
            }
            other => panic!("expected keyed, got {other:?}"),
        }
    }

    #[test]
    fn test_task_converts_to_sub_handler() {
        let nested = Task::default().with_name("inner");
        let handler: Handler = nested.into();
        assert!(matches!(handler, Handler::Sub(task) if task.name() == "inner"));
    }
}
