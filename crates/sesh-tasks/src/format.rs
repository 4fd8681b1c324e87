//! Formatting tasks.
//!
//! The root task formats its own files, then the TypeScript package, then
//! hands over to the Python package's task. Every step runs in its own
//! directory through the session; the process directory is left alone.

use crate::{PYTHON_DIR, TYPESCRIPT_DIR};
use async_trait::async_trait;
use sesh_core::{Session, SessionResult, Task};
use tracing::debug;

/// Paths the Python formatters are run on.
pub const PYTHON_FORMAT_ITEMS: [&str; 3] = ["npblob", "tests", "noxfile.py"];

/// Reported when `taplo` is not installed.
pub const TAPLO_MISSING_WARNING: &str = "Seems that `taplo` is not found, skip formatting \
pyproject.toml. (Refer to https://taplo.tamasfe.dev/ for information on how to install `taplo`)";

/// Formats the whole repository.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

#[async_trait]
impl Task for Format {
    fn name(&self) -> &str {
        "format"
    }

    fn description(&self) -> &str {
        "Format the root, TypeScript and Python sources"
    }

    async fn run(&self, session: &Session) -> SessionResult<()> {
        session.run("ruff", ["format", "noxfile.py"]).await?;

        session
            .in_dir(TYPESCRIPT_DIR)?
            .run("bun", ["run", "format"])
            .await?;

        session.delegate(PYTHON_DIR, "format").await
    }
}

/// Formats the Python package.
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonFormat;

#[async_trait]
impl Task for PythonFormat {
    fn name(&self) -> &str {
        "format"
    }

    fn description(&self) -> &str {
        "Format pyproject.toml and the Python sources"
    }

    async fn run(&self, session: &Session) -> SessionResult<()> {
        match session.run("taplo", ["fmt", "pyproject.toml"]).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => {
                debug!("taplo unavailable: {e}");
                session.warn(TAPLO_MISSING_WARNING);
            }
            Err(e) => return Err(e),
        }

        session.run("autoflake", PYTHON_FORMAT_ITEMS).await?;
        session.run("isort", PYTHON_FORMAT_ITEMS).await?;
        session
            .run("ruff", ["format"].into_iter().chain(PYTHON_FORMAT_ITEMS))
            .await?;
        Ok(())
    }
}
