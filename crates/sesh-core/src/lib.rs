//! sesh core - tasks, sessions and command execution.
//!
//! This crate provides the pieces a task runner is made of:
//!
//! - `registry` - named tasks and their dispatch
//! - `session` - the handle a task body uses to run commands
//! - `project` - per-directory registries and delegation between them
//! - `command` - external command specs and runners
//! - `scope` - scoped changes of the process working directory

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod project;
pub mod registry;
pub mod scope;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use command::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner, RunOptions};
pub use error::{SessionError, SessionResult};
pub use project::Project;
pub use registry::{Backend, FnTask, Task, TaskFuture, TaskRegistry};
pub use scope::{with_dir, DirGuard};
pub use session::Session;
