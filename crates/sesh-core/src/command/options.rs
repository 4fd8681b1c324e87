//! Session-wide defaults applied to every command.

use std::collections::BTreeMap;
use std::time::Duration;

/// Options shared by all commands a session runs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Echo each non-silent command line before running it.
    pub echo_commands: bool,
    /// Default per-command timeout.
    pub timeout: Option<Duration>,
    /// Environment variables added to every command.
    pub env_vars: BTreeMap<String, String>,
    /// Send streamed child stdout to stderr, keeping stdout for the driver.
    pub stdout_to_stderr: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            echo_commands: true,
            timeout: None,
            env_vars: BTreeMap::new(),
            stdout_to_stderr: false,
        }
    }
}

impl RunOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable command echo.
    pub fn echo_commands(mut self, echo: bool) -> Self {
        self.echo_commands = echo;
        self
    }

    /// Route streamed child stdout to stderr.
    pub fn stdout_to_stderr(mut self, redirect: bool) -> Self {
        self.stdout_to_stderr = redirect;
        self
    }

    /// Set timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// No timeout.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Add environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Add multiple environment variables.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}
