//! Error types for sessions and tasks.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running tasks and their commands.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The program could not be found on the host.
    #[error("command not found: {program}")]
    CommandNotFound {
        /// Program that was looked up.
        program: String,
    },

    /// The command ran but did not succeed.
    #[error("command `{command}` failed with exit code {exit_code}")]
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Exit code (`128 + signal` when killed by a signal).
        exit_code: i32,
        /// Captured standard error, empty when output was streamed.
        stderr: String,
    },

    /// The command exceeded its timeout and was killed.
    #[error("command `{command}` timed out after {duration:?}")]
    Timeout {
        /// Rendered command line.
        command: String,
        /// Timeout that was exceeded.
        duration: Duration,
    },

    /// Target directory does not exist or is not a directory.
    #[error("directory not found: {}", path.display())]
    DirectoryNotFound {
        /// Path that could not be entered.
        path: PathBuf,
    },

    /// No task with the requested name is registered.
    #[error("task not found: {name}")]
    TaskNotFound {
        /// Requested task name.
        name: String,
        /// Names that are registered, sorted.
        available: Vec<String>,
    },

    /// A task with the same name is already registered.
    #[error("task already registered: {name}")]
    DuplicateTask {
        /// Conflicting task name.
        name: String,
    },

    /// No task registry is registered for a directory.
    #[error("no task registry for directory: {}", dir.display())]
    NoRegistry {
        /// Directory that was looked up.
        dir: PathBuf,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SessionError {
    /// True for every failure to complete an external command.
    pub fn is_command_failure(&self) -> bool {
        matches!(
            self,
            Self::CommandNotFound { .. } | Self::CommandFailed { .. } | Self::Timeout { .. }
        )
    }

    /// True only when the program itself was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CommandNotFound { .. })
    }

    /// Exit code of the failed command, if there was one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }

    /// Get a recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<String> {
        match self {
            Self::CommandNotFound { program } => Some(format!(
                "Check that `{program}` is installed and on PATH. Try `command -v {program}`."
            )),
            Self::CommandFailed { exit_code, .. } => match exit_code {
                126 => Some("Command found but not executable. Check permissions.".to_string()),
                127 => Some("Command not found by the shell. Check spelling and PATH.".to_string()),
                code if *code > 128 => Some(format!("Process killed by signal {}.", code - 128)),
                _ => None,
            },
            Self::Timeout { duration, .. } => Some(format!(
                "Increase the timeout (was {duration:?}) or check if the command is hanging."
            )),
            Self::DirectoryNotFound { path } => Some(format!(
                "Verify that '{}' exists and is a directory.",
                path.display()
            )),
            Self::TaskNotFound { available, .. } if !available.is_empty() => {
                Some(format!("Available tasks: {}", available.join(", ")))
            }
            _ => None,
        }
    }

    /// Get error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CommandNotFound { .. } => "CMD_NOT_FOUND",
            Self::CommandFailed { .. } => "CMD_FAILED",
            Self::Timeout { .. } => "CMD_TIMEOUT",
            Self::DirectoryNotFound { .. } => "DIR_NOT_FOUND",
            Self::TaskNotFound { .. } => "TASK_NOT_FOUND",
            Self::DuplicateTask { .. } => "TASK_DUPLICATE",
            Self::NoRegistry { .. } => "NO_REGISTRY",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias for sessions.
pub type SessionResult<T> = std::result::Result<T, SessionError>;
