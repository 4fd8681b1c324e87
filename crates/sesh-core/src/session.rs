//! The session handle passed to task bodies.

use crate::command::{CommandOutput, CommandRunner, CommandSpec, RunOptions};
use crate::error::{SessionError, SessionResult};
use crate::project::Project;
use console::style;
use sesh_log::spans::{command_span, record_error};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn, Instrument};

/// Capability object handed to a task body.
///
/// Every command runs in the session's own working directory; the process
/// working directory is never touched. Child sessions made with
/// [`Session::in_dir`] share the runner, project and warning log.
#[derive(Clone)]
pub struct Session {
    name: String,
    invocation_id: String,
    working_dir: PathBuf,
    options: RunOptions,
    runner: Arc<dyn CommandRunner>,
    project: Option<Arc<Project>>,
    warnings: Arc<Mutex<Vec<String>>>,
}

impl Session {
    /// Create a session rooted at `working_dir`.
    pub fn new(working_dir: impl Into<PathBuf>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            name: String::new(),
            invocation_id: uuid::Uuid::new_v4().to_string(),
            working_dir: working_dir.into(),
            options: RunOptions::default(),
            runner,
            project: None,
            warnings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the run options.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach the project used for delegation.
    pub fn with_project(mut self, project: Arc<Project>) -> Self {
        self.project = Some(project);
        self
    }

    /// Copy of this session bound to the task `name`.
    pub fn for_task(&self, name: &str) -> Self {
        let mut session = self.clone();
        session.name = name.to_string();
        session
    }

    /// Name of the running task (empty before a task is bound).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique id of this invocation, shared by child sessions.
    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    /// Directory commands run in.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Options applied to every command.
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Project this session belongs to, if any.
    pub fn project(&self) -> Option<&Arc<Project>> {
        self.project.as_ref()
    }

    /// Run a command, echoing its command line and streaming its output.
    pub async fn run<I, S>(&self, program: &str, args: I) -> SessionResult<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_command(CommandSpec::new(program).args(args)).await
    }

    /// Run a command without echoing its command line.
    pub async fn run_silent<I, S>(&self, program: &str, args: I) -> SessionResult<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_command(CommandSpec::new(program).args(args).silent(true))
            .await
    }

    /// Run a command silently and return its captured stdout.
    pub async fn output<I, S>(&self, program: &str, args: I) -> SessionResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = CommandSpec::new(program).args(args).silent(true).capture(true);
        Ok(self.run_command(spec).await?.stdout)
    }

    /// Run a fully specified command.
    ///
    /// A relative working directory on `spec` is resolved against the
    /// session's. A non-zero exit becomes [`SessionError::CommandFailed`].
    pub async fn run_command(&self, spec: CommandSpec) -> SessionResult<CommandOutput> {
        let spec = self.prepare(spec);

        if self.options.echo_commands && !spec.silent {
            eprintln!("{} {}", style("sesh >").cyan().bold(), spec.command_line());
        }
        debug!(
            task = %self.name,
            dir = %spec.working_dir.display(),
            "running {}",
            spec.command_line()
        );

        let span = command_span(&spec.program, &spec.working_dir.display().to_string());
        let output = match self.runner.run(&spec).instrument(span.clone()).await {
            Ok(output) => output,
            Err(e) => {
                span.in_scope(|| record_error(&e));
                return Err(e);
            }
        };
        span.record("exit_code", output.exit_code);
        if !output.success() {
            return Err(SessionError::CommandFailed {
                command: spec.command_line(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }

    fn prepare(&self, mut spec: CommandSpec) -> CommandSpec {
        spec.working_dir = if spec.working_dir == Path::new(".") {
            self.working_dir.clone()
        } else {
            self.working_dir.join(&spec.working_dir)
        };

        let mut env = self.options.env_vars.clone();
        env.extend(std::mem::take(&mut spec.env_vars));
        spec.env_vars = env;

        if spec.timeout.is_none() {
            spec.timeout = self.options.timeout;
        }
        spec.stdout_to_stderr |= self.options.stdout_to_stderr;
        spec
    }

    /// Report a non-fatal problem and keep it in the warning log.
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        eprintln!("{} {}", style("sesh >").yellow().bold(), style(&message).yellow());
        warn!(task = %self.name, "{message}");
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message);
    }

    /// Warnings reported so far by this session and its children.
    pub fn warnings(&self) -> Vec<String> {
        self.warnings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Child session working in `path`, resolved against this session's
    /// directory.
    pub fn in_dir(&self, path: impl AsRef<Path>) -> SessionResult<Session> {
        let resolved = self.working_dir.join(path.as_ref());
        if !resolved.is_dir() {
            return Err(SessionError::DirectoryNotFound { path: resolved });
        }

        let mut child = self.clone();
        child.working_dir = resolved;
        Ok(child)
    }

    /// Run `task` from the registry registered for `dir`.
    pub async fn delegate(&self, dir: impl AsRef<Path>, task: &str) -> SessionResult<()> {
        let child = self.in_dir(dir)?;
        let project = self
            .project
            .clone()
            .ok_or_else(|| SessionError::NoRegistry {
                dir: child.working_dir.clone(),
            })?;
        let registry = project.registry_for(&child.working_dir)?;

        debug!(
            task = %task,
            dir = %child.working_dir.display(),
            "delegating"
        );
        registry.run(task, &child).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.name)
            .field("invocation_id", &self.invocation_id)
            .field("working_dir", &self.working_dir)
            .field("options", &self.options)
            .field("project", &self.project.as_ref().map(|p| p.root().to_path_buf()))
            .finish()
    }
}
