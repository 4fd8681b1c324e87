//! A project root and the task registries of its member directories.

use crate::command::{CommandRunner, RunOptions};
use crate::error::{SessionError, SessionResult};
use crate::registry::TaskRegistry;
use crate::session::Session;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Root directory plus one task registry per member directory.
///
/// Members are keyed by their path relative to the root; the root itself is
/// the member `"."`.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    members: BTreeMap<PathBuf, Arc<TaskRegistry>>,
}

impl Project {
    /// Create a project rooted at `root`, which must be an existing directory.
    pub fn new(root: impl AsRef<Path>) -> SessionResult<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|_| SessionError::DirectoryNotFound {
                path: root.to_path_buf(),
            })?;
        if !root.is_dir() {
            return Err(SessionError::DirectoryNotFound { path: root });
        }

        Ok(Self {
            root,
            members: BTreeMap::new(),
        })
    }

    /// Add the registry for `dir` (relative to the root), replacing any
    /// previous one.
    pub fn add_member(&mut self, dir: impl AsRef<Path>, registry: TaskRegistry) {
        self.members.insert(normalize(dir.as_ref()), Arc::new(registry));
    }

    /// Builder form of [`Project::add_member`].
    pub fn with_member(mut self, dir: impl AsRef<Path>, registry: TaskRegistry) -> Self {
        self.add_member(dir, registry);
        self
    }

    /// Canonical root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Member directories (relative, `"."` for the root) with their registries.
    pub fn members(&self) -> impl Iterator<Item = (PathBuf, &Arc<TaskRegistry>)> {
        self.members.iter().map(|(dir, registry)| (display_key(dir), registry))
    }

    /// Registry for `dir`, given absolute or relative to the root.
    pub fn registry_for(&self, dir: impl AsRef<Path>) -> SessionResult<&Arc<TaskRegistry>> {
        let dir = dir.as_ref();
        let absolute = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        };
        let canonical = absolute
            .canonicalize()
            .map_err(|_| SessionError::DirectoryNotFound {
                path: absolute.clone(),
            })?;

        canonical
            .strip_prefix(&self.root)
            .ok()
            .and_then(|relative| self.members.get(&normalize(relative)))
            .ok_or(SessionError::NoRegistry { dir: absolute })
    }

    /// Session working in `dir` that can delegate into this project.
    pub fn session(
        self: &Arc<Self>,
        dir: impl AsRef<Path>,
        runner: Arc<dyn CommandRunner>,
        options: RunOptions,
    ) -> SessionResult<Session> {
        let base = Session::new(self.root.clone(), runner)
            .with_options(options)
            .with_project(Arc::clone(self));
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() || dir == Path::new(".") {
            Ok(base)
        } else {
            base.in_dir(dir)
        }
    }

    /// Run `task` from the registry of `dir`.
    pub async fn run(
        self: &Arc<Self>,
        dir: impl AsRef<Path>,
        task: &str,
        runner: Arc<dyn CommandRunner>,
        options: RunOptions,
    ) -> SessionResult<Session> {
        let session = self.session(dir, runner, options)?;
        let registry = self.registry_for(session.working_dir())?;
        registry.run(task, &session).await?;
        Ok(session)
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn display_key(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        path.to_path_buf()
    }
}
