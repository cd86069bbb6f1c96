//! # Task abstractions.
//!
//! This module provides the core task-related types:
//! - [`Task`] - a handler bound to options and result/error state
//! - [`Handler`] - the closed variant of executable shapes (function, nested
//!   task, ordered sequence, keyed sequence)
//! - [`Step`] - one entry of an ordered sequence
//! - [`HandlerFn`] - shared handle to a handler function

mod handler;
mod task;

pub use handler::{Handler, HandlerFn, Step};
pub use task::Task;
