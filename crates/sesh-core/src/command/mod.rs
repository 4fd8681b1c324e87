//! External command execution.

mod options;
mod spec;

pub use options::RunOptions;
pub use spec::{CommandOutput, CommandSpec};

use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Executes command specs.
///
/// A runner reports a non-zero exit through [`CommandOutput::exit_code`];
/// it only returns an error when the command could not be run to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command and wait for it to finish.
    async fn run(&self, spec: &CommandSpec) -> SessionResult<CommandOutput>;
}

/// Runs commands as child processes of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> SessionResult<CommandOutput> {
        let start = Instant::now();

        // A missing cwd makes spawn fail with NotFound, indistinguishable from a missing program.
        if !spec.working_dir.is_dir() {
            return Err(SessionError::DirectoryNotFound {
                path: spec.working_dir.clone(),
            });
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if spec.capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        } else if spec.stdout_to_stderr {
            cmd.stdout(std::io::stderr()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }

        for (key, value) in &spec.env_vars {
            cmd.env(key, value);
        }

        let child = cmd.spawn().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SessionError::CommandNotFound {
                program: spec.program.clone(),
            },
            _ => SessionError::Io(e),
        })?;

        let output = match spec.timeout {
            Some(duration) => {
                match tokio::time::timeout(duration, child.wait_with_output()).await {
                    Ok(result) => result?,
                    // Dropping the future drops the child, which kills it.
                    Err(_) => {
                        return Err(SessionError::Timeout {
                            command: spec.command_line(),
                            duration,
                        })
                    }
                }
            }
            None => child.wait_with_output().await?,
        };

        let exit_code = exit_code_of(output.status);
        let duration = start.elapsed();
        debug!("Command completed with exit code {} in {:?}", exit_code, duration);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
        })
    }
}

/// Exit code of a finished child, mapping signals to `128 + signal`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tmp() -> std::path::PathBuf {
        std::env::temp_dir()
    }

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let spec = CommandSpec::new("echo")
            .arg("hello world")
            .working_dir(tmp())
            .capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.trim(), "hello world");
        assert!(output.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_reported_not_raised() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "exit 42"])
            .working_dir(tmp())
            .capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert_eq!(output.exit_code, 42);
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_capture_wins_over_stderr_redirect() {
        let spec = CommandSpec::new("echo")
            .arg("kept")
            .working_dir(tmp())
            .stdout_to_stderr(true)
            .capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert_eq!(output.stdout.trim(), "kept");
    }

    #[tokio::test]
    async fn test_stdout_to_stderr_streams() {
        let spec = CommandSpec::new("echo")
            .arg("to stderr")
            .working_dir(tmp())
            .stdout_to_stderr(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert!(output.success());
        assert!(output.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let spec = CommandSpec::new("sesh-definitely-not-installed-binary").working_dir(tmp());
        let err = ProcessRunner.run(&spec).await.unwrap_err();

        assert!(err.is_not_found());
        match err {
            SessionError::CommandNotFound { program } => {
                assert_eq!(program, "sesh-definitely-not-installed-binary")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_working_dir() {
        let spec = CommandSpec::new("echo").working_dir("/definitely/not/a/dir");
        let err = ProcessRunner.run(&spec).await.unwrap_err();

        assert!(matches!(err, SessionError::DirectoryNotFound { .. }));
    }

    #[tokio::test]
    async fn test_working_dir_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let spec = CommandSpec::new("pwd").working_dir(dir.path()).capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        let expected = dir.path().canonicalize().unwrap();
        let actual = std::path::PathBuf::from(output.stdout.trim())
            .canonicalize()
            .unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_env_vars_are_passed() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "echo $SESH_TEST_VAR"])
            .env("SESH_TEST_VAR", "test_value")
            .working_dir(tmp())
            .capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert_eq!(output.stdout.trim(), "test_value");
    }

    #[tokio::test]
    async fn test_timeout() {
        let spec = CommandSpec::new("sleep")
            .arg("5")
            .working_dir(tmp())
            .timeout(Some(Duration::from_millis(100)));
        let err = ProcessRunner.run(&spec).await.unwrap_err();

        assert!(err.is_command_failure());
        assert!(matches!(err, SessionError::Timeout { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_signal_exit_code() {
        let spec = CommandSpec::new("sh")
            .args(["-c", "kill -9 $$"])
            .working_dir(tmp())
            .capture(true);
        let output = ProcessRunner.run(&spec).await.unwrap();

        assert_eq!(output.exit_code, 128 + 9);
    }
}
