//! Configuration types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeshConfig {
    /// Command runner settings.
    pub runner: RunnerConfig,
    /// Logging settings.
    pub log: LogSettings,
}

/// Command runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Print `sesh > <command>` before each non-silent command.
    pub echo_commands: bool,
    /// Per-command timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Extra environment for every command.
    pub env: BTreeMap<String, String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            echo_commands: true,
            timeout_secs: None,
            env: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Per-command timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Logging configuration as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
    /// Output format (`pretty`, `compact`, `json`).
    pub format: String,
    /// Also append logs to this file.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LogSettings {
    /// Convert to a logging configuration.
    ///
    /// Call after validation; an unparsable level falls back to the default.
    pub fn to_log_config(&self) -> sesh_log::LogConfig {
        let mut config = sesh_log::LogConfig::default()
            .with_level(sesh_log::LogLevel::parse(&self.level).unwrap_or_default())
            .with_format(sesh_log::LogFormat::parse(&self.format));
        if let Some(file) = &self.file {
            config = config.with_file(file);
        }
        config
    }
}
