//! CLI error handling and formatting.

use std::io;
use std::process::ExitCode;

use sesh_config::{ConfigError, EnvError};
use sesh_core::SessionError;
use sesh_log::LogError;
use thiserror::Error;

use crate::help::suggestions::suggest_command;

pub mod formatter;
pub mod handler;

pub use formatter::ErrorFormatter;
pub use handler::{handle_result, setup_panic_handler};

/// CLI error type with rich context
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    NotFound {
        message: String,
        resource_type: String,
        resource_name: String,
        suggestions: Vec<String>,
    },

    #[error("{message}")]
    Command {
        message: String,
        command: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        hint: Option<String>,
    },

    #[error("interrupted")]
    Interrupted,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Get the error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "E001",
            Self::Io { .. } => "E002",
            Self::NotFound { .. } => "E005",
            Self::Command { .. } => "E007",
            Self::Interrupted => "E130",
            Self::Other(_) => "E999",
        }
    }

    /// Numeric process exit status for this error
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } => 3,
            Self::NotFound { .. } => 6,
            Self::Command { .. } => 8,
            Self::Interrupted => 130,
            Self::Other(_) => 1,
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Get hint for this error if available
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::Config { hint, .. } => hint.as_deref(),
            Self::Command { hint, .. } => hint.as_deref(),
            Self::NotFound { suggestions, .. } if !suggestions.is_empty() => {
                Some("See suggestions below")
            }
            _ => None,
        }
    }

    /// Get suggestions for this error
    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, resource_name: impl Into<String>) -> Self {
        Self::not_found_with_suggestions(resource_type, resource_name, vec![])
    }

    /// Create a not found error with suggestions
    pub fn not_found_with_suggestions(
        resource_type: impl Into<String>,
        resource_name: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        let resource_type = resource_type.into();
        let resource_name = resource_name.into();
        Self::NotFound {
            message: format!("{resource_type} not found: {resource_name}"),
            resource_type,
            resource_name,
            suggestions,
        }
    }

    /// Unknown task, with a "did you mean" suggestion when one is close
    pub fn unknown_task<S: AsRef<str>>(name: &str, available: &[S]) -> Self {
        let available: Vec<&str> = available.iter().map(AsRef::as_ref).collect();
        let mut suggestions = Vec::new();
        if let Some(suggestion) = suggest_command(name, &available) {
            suggestions.push(suggestion);
        }
        if !available.is_empty() {
            suggestions.push(format!("Available tasks: {}", available.join(", ")));
        }
        suggestions.push("Run 'sesh list' to see task descriptions".to_string());
        Self::not_found_with_suggestions("task", name, suggestions)
    }
}

// Conversion implementations
impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(anyhow::anyhow!("JSON serialization failed: {err}"))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let hint = match &err {
            ConfigError::EnvVarNotFound { var } => {
                format!("Set {var} or give it a default with ${{{var}:-value}}")
            }
            ConfigError::NotFound { .. } => {
                "Check the path given with --config or SESH_CONFIG".to_string()
            }
            _ => "Check .sesh/config.yaml".to_string(),
        };
        Self::Config {
            message: format!("Configuration error: {err}"),
            source: Some(Box::new(err)),
            hint: Some(hint),
        }
    }
}

impl From<EnvError> for CliError {
    fn from(err: EnvError) -> Self {
        Self::Config {
            message: format!("Environment error: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check the .env and .env.local files of the project".to_string()),
        }
    }
}

impl From<LogError> for CliError {
    fn from(err: LogError) -> Self {
        Self::Config {
            message: format!("Logging setup failed: {err}"),
            source: Some(Box::new(err)),
            hint: Some("Check log.file in .sesh/config.yaml or SESH_LOG_FILE".to_string()),
        }
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::TaskNotFound { name, available } => Self::unknown_task(&name, &available),
            SessionError::DirectoryNotFound { path } => {
                Self::not_found("directory", path.display().to_string())
            }
            SessionError::NoRegistry { dir } => Self::not_found_with_suggestions(
                "task registry",
                dir.display().to_string(),
                vec!["Run sesh from the project root or one of its member directories".to_string()],
            ),
            SessionError::Io(source) => source.into(),
            err if err.is_command_failure() => {
                let command = match &err {
                    SessionError::CommandNotFound { program } => program.clone(),
                    SessionError::CommandFailed { command, .. }
                    | SessionError::Timeout { command, .. } => command.clone(),
                    _ => String::new(),
                };
                Self::Command {
                    message: err.to_string(),
                    command,
                    hint: err.recovery_suggestion(),
                    source: Some(Box::new(err)),
                }
            }
            err => Self::Other(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_statuses() {
        assert_eq!(
            CliError::from(ConfigError::ValidationError {
                message: "x".into()
            })
            .exit_status(),
            2
        );
        assert_eq!(
            CliError::from(io::Error::new(io::ErrorKind::Other, "x")).exit_status(),
            3
        );
        assert_eq!(CliError::not_found("task", "x").exit_status(), 6);
        assert_eq!(CliError::Interrupted.exit_status(), 130);
        assert_eq!(CliError::Other(anyhow::anyhow!("x")).exit_status(), 1);
    }

    #[test]
    fn test_unknown_task_suggests_closest() {
        let err = CliError::unknown_task("fromat", &["format", "shell_completion"]);

        assert_eq!(err.to_string(), "task not found: fromat");
        assert_eq!(err.suggestions()[0], "Did you mean 'format'?");
        assert!(err.suggestions()[1].contains("format, shell_completion"));
        assert_eq!(err.hint(), Some("See suggestions below"));
    }

    #[test]
    fn test_unknown_task_without_close_match() {
        let err = CliError::unknown_task("zzzzzzzz", &["format"]);
        assert!(err.suggestions().iter().all(|s| !s.starts_with("Did you mean")));
    }

    #[test]
    fn test_session_error_mapping() {
        let err = CliError::from(SessionError::TaskNotFound {
            name: "fmt".into(),
            available: vec!["format".into()],
        });
        assert_eq!(err.exit_status(), 6);
        assert_eq!(err.suggestions()[0], "Did you mean 'format'?");

        let err = CliError::from(SessionError::CommandNotFound {
            program: "taplo".into(),
        });
        assert_eq!(err.exit_status(), 8);
        assert!(err.hint().unwrap().contains("`taplo` is installed"));

        let err = CliError::from(SessionError::CommandFailed {
            command: "bun run format".into(),
            exit_code: 2,
            stderr: String::new(),
        });
        assert!(matches!(&err, CliError::Command { command, .. } if command == "bun run format"));
        assert_eq!(err.exit_status(), 8);

        let err = CliError::from(SessionError::NoRegistry {
            dir: PathBuf::from("/repo/docs"),
        });
        assert_eq!(err.exit_status(), 6);
        assert_eq!(err.to_string(), "task registry not found: /repo/docs");

        let err = CliError::from(SessionError::DuplicateTask {
            name: "format".into(),
        });
        assert_eq!(err.exit_status(), 1);
    }

    #[test]
    fn test_config_error_mapping() {
        let err = CliError::from(ConfigError::EnvVarNotFound {
            var: "SESH_X".into(),
        });
        assert_eq!(err.exit_status(), 2);
        assert_eq!(err.hint(), Some("Set SESH_X or give it a default with ${SESH_X:-value}"));
    }
}
