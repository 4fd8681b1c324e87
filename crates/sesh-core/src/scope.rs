//! Scoped changes of the process working directory.
//!
//! Sessions carry their own working directory and never need this; it exists
//! for code that has to run with the process itself inside another directory.

use crate::error::{SessionError, SessionResult};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Changes the process working directory and restores it on drop.
#[derive(Debug)]
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
pub struct DirGuard {
    previous: PathBuf,
    target: PathBuf,
}

impl DirGuard {
    /// Record the current directory and switch to `path`.
    ///
    /// Fails with [`SessionError::DirectoryNotFound`] if `path` does not
    /// exist or is not a directory; the working directory is then unchanged.
    pub fn enter(path: impl AsRef<Path>) -> SessionResult<Self> {
        let target = path.as_ref().to_path_buf();
        let previous = std::env::current_dir()?;

        std::env::set_current_dir(&target).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SessionError::DirectoryNotFound {
                path: target.clone(),
            },
            _ if !target.is_dir() => SessionError::DirectoryNotFound {
                path: target.clone(),
            },
            _ => SessionError::Io(e),
        })?;

        debug!(from = %previous.display(), to = %target.display(), "entered directory");
        Ok(Self { previous, target })
    }

    /// Directory that will be restored.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Directory that was entered.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            error!(dir = %self.previous.display(), "failed to restore working directory: {e}");
        } else {
            debug!(to = %self.previous.display(), "restored directory");
        }
    }
}

/// Run `f` with the process inside `path`, restoring the directory before
/// returning whatever `f` returned.
pub fn with_dir<T, E, F>(path: impl AsRef<Path>, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<SessionError>,
{
    let guard = DirGuard::enter(path)?;
    let result = f();
    drop(guard);
    result
}
