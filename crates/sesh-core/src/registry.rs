//! Named tasks and the registry that dispatches them.

use crate::error::{SessionError, SessionResult};
use crate::session::Session;
use async_trait::async_trait;
use sesh_log::spans::{instrument_future, record_error, task_span, Timer};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, info};

/// Execution environment a task needs.
///
/// Only `None` exists: tasks use the tools already installed on the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Backend {
    /// No isolated environment is built.
    #[default]
    None,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
        }
    }
}

/// A named unit of work.
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique name within a registry.
    fn name(&self) -> &str;

    /// One-line description shown by `sesh list`.
    fn description(&self) -> &str {
        ""
    }

    /// Execution environment.
    fn backend(&self) -> Backend {
        Backend::None
    }

    /// Run the task body.
    async fn run(&self, session: &Session) -> SessionResult<()>;
}

/// Boxed future returned by closure task bodies.
pub type TaskFuture<'a> = Pin<Box<dyn Future<Output = SessionResult<()>> + Send + 'a>>;

/// Task backed by a closure.
pub struct FnTask<F> {
    name: String,
    description: String,
    body: F,
}

impl<F> FnTask<F>
where
    F: for<'a> Fn(&'a Session) -> TaskFuture<'a> + Send + Sync,
{
    /// Wrap `body` as a task called `name`.
    pub fn new(name: impl Into<String>, description: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            body,
        }
    }
}

#[async_trait]
impl<F> Task for FnTask<F>
where
    F: for<'a> Fn(&'a Session) -> TaskFuture<'a> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, session: &Session) -> SessionResult<()> {
        (self.body)(session).await
    }
}

/// Maps task names to task bodies.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Arc<dyn Task>>,
}

impl TaskRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Names must be unique.
    pub fn register(&mut self, task: impl Task + 'static) -> SessionResult<()> {
        self.register_arc(Arc::new(task))
    }

    /// Register an already shared task.
    pub fn register_arc(&mut self, task: Arc<dyn Task>) -> SessionResult<()> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(SessionError::DuplicateTask { name });
        }
        self.tasks.insert(name, task);
        Ok(())
    }

    /// Register a closure as a task.
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        body: F,
    ) -> SessionResult<()>
    where
        F: for<'a> Fn(&'a Session) -> TaskFuture<'a> + Send + Sync + 'static,
    {
        self.register(FnTask::new(name, description, body))
    }

    /// Look up a task.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Task>> {
        self.tasks.get(name)
    }

    /// Whether a task is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.tasks.keys().map(String::as_str).collect()
    }

    /// Registered tasks in name order.
    pub fn tasks(&self) -> impl Iterator<Item = &Arc<dyn Task>> {
        self.tasks.values()
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run the task called `name` with a session derived from `session`.
    pub async fn run(&self, name: &str, session: &Session) -> SessionResult<()> {
        let task = self
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::TaskNotFound {
                name: name.to_string(),
                available: self.tasks.keys().cloned().collect(),
            })?;

        let session = session.for_task(name);
        let span = task_span(name, session.invocation_id());

        let run = async move {
            info!(
                backend = %task.backend(),
                dir = %session.working_dir().display(),
                "running task"
            );
            let timer = Timer::start("task");
            let result = task.run(&session).await;
            timer.finish();

            match &result {
                Ok(()) => info!("task completed"),
                Err(e) => {
                    record_error(e);
                    debug!("task failed: {e}");
                }
            }
            result
        };
        instrument_future(run, span).await
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.names())
            .finish()
    }
}
