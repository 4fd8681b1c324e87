//! Tasks of the project: the root registry, the `python/` member registry
//! and the [`project`] that ties them together.

mod completion;
mod format;

pub use completion::{ShellCompletion, SHELL_COMPLETION_DESC};
pub use format::{Format, PythonFormat, PYTHON_FORMAT_ITEMS, TAPLO_MISSING_WARNING};

use sesh_core::{Project, SessionResult, TaskRegistry};
use std::path::{Path, PathBuf};

/// TypeScript package directory, relative to the project root.
pub const TYPESCRIPT_DIR: &str = "typescript";

/// Python package directory, relative to the project root.
pub const PYTHON_DIR: &str = "python";

/// Tasks available at the project root.
pub fn root_registry() -> SessionResult<TaskRegistry> {
    let mut registry = TaskRegistry::new();
    registry.register(ShellCompletion)?;
    registry.register(Format)?;
    Ok(registry)
}

/// Tasks available in [`PYTHON_DIR`].
pub fn python_registry() -> SessionResult<TaskRegistry> {
    let mut registry = TaskRegistry::new();
    registry.register(ShellCompletion)?;
    registry.register(PythonFormat)?;
    Ok(registry)
}

/// Project root for `start` when no `.sesh/config.yaml` marks one.
///
/// Started in the [`PYTHON_DIR`] member of a directory that also holds
/// [`TYPESCRIPT_DIR`], the root is that parent. Otherwise `start` is its
/// own root.
pub fn locate_root(start: impl AsRef<Path>) -> PathBuf {
    let start = start.as_ref();
    match start.parent() {
        Some(parent) if parent.join(PYTHON_DIR) == start && is_layout_root(parent) => {
            parent.to_path_buf()
        }
        _ => start.to_path_buf(),
    }
}

fn is_layout_root(dir: &Path) -> bool {
    dir.join(TYPESCRIPT_DIR).is_dir() && dir.join(PYTHON_DIR).is_dir()
}

/// Project rooted at `root` with both registries.
pub fn project(root: impl AsRef<Path>) -> SessionResult<Project> {
    Ok(Project::new(root)?
        .with_member(".", root_registry()?)
        .with_member(PYTHON_DIR, python_registry()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesh_core::Backend;
    use sesh_test_utils::temp_project;
    use std::path::PathBuf;

    #[test]
    fn test_registries() {
        let root = root_registry().unwrap();
        assert_eq!(root.names(), vec!["format", "shell_completion"]);

        let python = python_registry().unwrap();
        assert_eq!(python.names(), vec!["format", "shell_completion"]);
        assert!(python.tasks().all(|task| task.backend() == Backend::None));
    }

    #[test]
    fn test_project_members() {
        let dir = temp_project(&[PYTHON_DIR, TYPESCRIPT_DIR]);
        let project = project(dir.path()).unwrap();

        let members: Vec<PathBuf> = project.members().map(|(dir, _)| dir).collect();
        assert_eq!(members, vec![PathBuf::from("."), PathBuf::from(PYTHON_DIR)]);
        assert!(project.registry_for(PYTHON_DIR).unwrap().contains("format"));
    }

    #[test]
    fn test_locate_root_from_python_member() {
        let dir = temp_project(&[PYTHON_DIR, TYPESCRIPT_DIR]);
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(locate_root(root.join(PYTHON_DIR)), root);
        assert_eq!(locate_root(&root), root);
    }

    #[test]
    fn test_locate_root_outside_layout() {
        let dir = temp_project(&[PYTHON_DIR, "docs"]);
        let root = dir.path().canonicalize().unwrap();

        // No typescript/ sibling, so python/ stands alone
        assert_eq!(locate_root(root.join(PYTHON_DIR)), root.join(PYTHON_DIR));
        assert_eq!(locate_root(root.join("docs")), root.join("docs"));
    }

    #[tokio::test]
    async fn test_located_root_runs_python_format() {
        use sesh_core::testing::RecordingRunner;
        use sesh_core::RunOptions;
        use std::sync::Arc;

        let dir = temp_project(&[PYTHON_DIR, TYPESCRIPT_DIR]);
        let python = dir.path().canonicalize().unwrap().join(PYTHON_DIR);
        let project = Arc::new(project(locate_root(&python)).unwrap());
        let runner = Arc::new(RecordingRunner::new());

        project
            .run(&python, "format", runner.clone(), RunOptions::new().echo_commands(false))
            .await
            .unwrap();

        assert_eq!(runner.programs(), vec!["taplo", "autoflake", "isort", "ruff"]);
    }
}
