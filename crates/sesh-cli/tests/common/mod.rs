//! Common test utilities for CLI testing.

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::Command;
use tempfile::TempDir;

/// Environment variables that would leak the developer's setup into tests
const SCRUBBED_VARS: [&str; 7] = [
    "SESH_CONFIG",
    "SESH_LOG_LEVEL",
    "SESH_LOG_FORMAT",
    "SESH_LOG_FILE",
    "SESH_LOG_SOURCE",
    "SESH_LOG_SPANS",
    "RUST_LOG",
];

/// A throwaway project: `.sesh/config.yaml`, `python/`, `typescript/` and a
/// `bin/` directory of fake tools that is searched before the system PATH.
pub struct TestContext {
    pub temp_dir: TempDir,
    root: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        Self::without_config().with_config("runner:\n  echo_commands: true\n")
    }

    /// The same layout with no `.sesh/` directory
    pub fn without_config() -> Self {
        let temp_dir = sesh_test_utils::temp_project(&["python", "typescript", "docs", "bin"]);
        let root = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");

        Self { temp_dir, root }
    }

    /// Replace the project config
    pub fn with_config(self, yaml: &str) -> Self {
        sesh_test_utils::write_config(&self.root, yaml);
        self
    }

    /// Install a fake tool that logs `<name> <args> @ <cwd>` and exits with `code`
    #[cfg(unix)]
    pub fn with_tool(self, name: &str, code: i32) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root.join("bin").join(name);
        let script = format!(
            "#!/bin/sh\necho \"$(basename \"$0\") $* @ $(pwd -P)\" >> \"$SESH_TEST_LOG\"\nexit {code}\n"
        );
        std::fs::write(&path, script).expect("Failed to write fake tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
        self
    }

    /// Install every formatter as a succeeding fake, except those in `skip`
    #[cfg(unix)]
    pub fn with_formatters(self, skip: &[&str]) -> Self {
        ["ruff", "bun", "taplo", "autoflake", "isort"]
            .into_iter()
            .filter(|tool| !skip.contains(tool))
            .fold(self, |ctx, tool| ctx.with_tool(tool, 0))
    }

    /// Canonical project root
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("tools.log")
    }

    /// Lines written by fake tools, in call order
    pub fn tool_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// A `sesh` command started in `dir` (relative to the root)
    pub fn command_in(&self, dir: &str) -> Command {
        let mut cmd = Command::cargo_bin("sesh").expect("Binary not found");
        for var in SCRUBBED_VARS {
            cmd.env_remove(var);
        }
        cmd.current_dir(self.root.join(dir))
            .env("NO_COLOR", "1")
            .env("SESH_TEST_LOG", self.log_path())
            .env(
                "PATH",
                format!("{}:/usr/local/bin:/usr/bin:/bin", self.root.join("bin").display()),
            );
        cmd
    }

    /// A `sesh` command started at the project root
    pub fn command(&self) -> Command {
        self.command_in(".")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Assert helpers for CLI output
pub trait OutputAssertions {
    fn assert_success(&self);
    fn assert_stdout_contains(&self, text: &str);
    fn assert_stderr_contains(&self, text: &str);
    fn assert_exit_code(&self, code: i32);
}

impl OutputAssertions for Output {
    fn assert_success(&self) {
        assert!(
            self.status.success(),
            "Command failed with status: {}\nstderr: {}",
            self.status,
            String::from_utf8_lossy(&self.stderr)
        );
    }

    fn assert_stdout_contains(&self, text: &str) {
        let stdout = String::from_utf8_lossy(&self.stdout);
        assert!(
            stdout.contains(text),
            "stdout did not contain '{text}'\nstdout: {stdout}"
        );
    }

    fn assert_stderr_contains(&self, text: &str) {
        let stderr = String::from_utf8_lossy(&self.stderr);
        assert!(
            stderr.contains(text),
            "stderr did not contain '{text}'\nstderr: {stderr}"
        );
    }

    fn assert_exit_code(&self, code: i32) {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Expected exit code {code}, got {:?}\nstderr: {}",
            self.status.code(),
            String::from_utf8_lossy(&self.stderr)
        );
    }
}
