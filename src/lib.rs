//! # taskpipe
//!
//! **Taskpipe** is a lightweight synchronous task-composition library for
//! Rust.
//!
//! It provides primitives to register named tasks, configure them with
//! dotted-path options, and run input data through a task or a chain of
//! tasks until all succeed or one fails. There is no I/O, storage, or
//! concurrency layer: the crate is a pure in-memory control-flow helper.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────────────────────────────────────────────────┐
//!     │  Registry (name → blueprint: handler + default options)  │
//!     │  - register / register_with / register_task              │
//!     │  - factory builds live Task instances                    │
//!     │  - global() process-wide default                         │
//!     └──────────────┬───────────────────────────────────────────┘
//!                    │ factory(name)
//!                    ▼
//!     ┌──────────────────────────┐
//!     │  Task                    │    Handler dispatch:
//!     │  - options (dotted path) │    ├─ Func      (plain function)
//!     │  - handler               │    ├─ Sub       (nested task)
//!     │  - result ⊕ error        │    ├─ Sequence  (ordered steps)
//!     │  - process(data) → bool  │    └─ Keyed     (name → options)
//!     └──────────────────────────┘
//!                    ▲
//!                    │ resolves specs, threads results
//!     ┌──────────────┴───────────────────────────────────────────┐
//!     │  apply(data, tasks) → {data} | {error}                   │
//!     │  - runs tasks strictly in order                          │
//!     │  - each step sees a deep copy of the running data        │
//!     │  - first failure short-circuits the rest                 │
//!     └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Processing lifecycle
//! ```text
//! Task::process(data)
//!   ├─► result = deep copy of data; error = None
//!   ├─► dispatch on handler shape:
//!   │     ├─ Func      ─► f(original data, &mut task)
//!   │     │               Err(fault) ─► stored as {code, message}
//!   │     ├─ Sub       ─► nested.process(running result)
//!   │     │               copy nested result/error into self
//!   │     └─ Sequence / Keyed:
//!   │          for each entry (registry name or inline handler):
//!   │            ├─► run on running result, copy outcome into self
//!   │            └─► error? ─► stop, later entries never run
//!   └─► Ok(true) iff no error
//!
//! Registry misuse (unregistered name, nameless registration) is a
//! programmer error: it propagates as Err(RegistryError) instead of being
//! recorded in task state.
//! ```
//!
//! ## Features
//! | Area          | Description                                              | Key types / functions              |
//! |---------------|----------------------------------------------------------|------------------------------------|
//! | **Tasks**     | Bind a handler to options and result/error state.        | [`Task`], [`Handler`], [`Step`]    |
//! | **Registry**  | Name → blueprint store with a factory and a global.      | [`Registry`]                       |
//! | **Chains**    | Ordered execution with result threading and early abort. | [`apply`], [`TaskSpec`]            |
//! | **Outcomes**  | Exactly one of data/error, serializable.                 | [`ApplyOutcome`], [`TaskError`]    |
//! | **Built-ins** | Path extraction out of response payloads.                | `DataSource` (see [`Registry`])    |
//!
//! ## Example
//! ```rust
//! use serde_json::{Value, json};
//! use taskpipe::{apply_in, Handler, Registry, Task};
//!
//! let registry = Registry::new();
//!
//! registry.register("trim", Handler::func(|data: &Value, task: &mut Task| {
//!     match data.as_str() {
//!         Some(s) => task.set_process_result(json!(s.trim())),
//!         None => task.set_process_error("Data must be a string"),
//!     }
//!     Ok(())
//! }));
//! registry.register("shout", Handler::func(|data: &Value, task: &mut Task| {
//!     match data.as_str() {
//!         Some(s) => task.set_process_result(json!(s.to_uppercase())),
//!         None => task.set_process_error("Data must be a string"),
//!     }
//!     Ok(())
//! }));
//! registry.register("clean", Handler::sequence(["trim", "shout"]));
//!
//! let outcome = apply_in(&registry, &json!("  hello  "), ["clean"]).unwrap();
//! assert_eq!(outcome.data(), Some(&json!("HELLO")));
//!
//! let outcome = apply_in(&registry, &json!(42), ["clean"]).unwrap();
//! assert_eq!(outcome.error().map(|e| e.message.as_str()), Some("Data must be a string"));
//! ```

mod apply;
mod datasource;
mod error;
pub mod paths;
mod registry;
mod tasks;

// ---- Public re-exports ----

pub use apply::{ApplyOutcome, TaskSpec, apply, apply_in};
pub use error::{RegistryError, TaskError};
pub use registry::Registry;
pub use tasks::{Handler, HandlerFn, Step, Task};
