//! Configuration file loading and parsing.

use crate::types::SeshConfig;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Directory holding the project configuration.
pub const CONFIG_DIR: &str = ".sesh";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.yaml";

const LOG_FORMATS: [&str; 3] = ["pretty", "compact", "json"];

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

/// Configuration loader for one project root.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    base_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            base_path: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Loader for the nearest ancestor of `start` (inclusive) that holds
    /// `.sesh/config.yaml`, if any does.
    pub fn discover(start: impl AsRef<Path>) -> Option<Self> {
        let root = start
            .as_ref()
            .ancestors()
            .find(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE).is_file())?;

        debug!(root = %root.display(), "found project config");
        Some(Self::new(root))
    }

    /// Project root this loader reads from.
    pub fn project_root(&self) -> &Path {
        &self.base_path
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> PathBuf {
        self.base_path.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from `.sesh/config.yaml`, defaulting when absent.
    pub fn load(&self) -> Result<SeshConfig, ConfigError> {
        let config_path = self.config_path();

        if !config_path.exists() {
            return Ok(SeshConfig::default());
        }

        self.load_file(&config_path)
    }

    /// Load configuration from an explicit file, which must exist.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<SeshConfig, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path)?;
        let expanded = self.expand_env_vars(&contents)?;

        let config: SeshConfig = serde_yaml::from_str(&expanded).map_err(|e| {
            ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            }
        })?;

        self.validate(&config)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
    fn expand_env_vars(&self, content: &str) -> Result<String, ConfigError> {
        let re = Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").map_err(|e| {
            ConfigError::ParseError {
                line: None,
                message: e.to_string(),
            }
        })?;

        let mut missing = None;
        let expanded = re.replace_all(content, |cap: &Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => match cap.get(2) {
                    Some(default) => default.as_str().to_string(),
                    None => {
                        missing.get_or_insert_with(|| var_name.to_string());
                        String::new()
                    }
                },
            }
        });

        match missing {
            Some(var) => Err(ConfigError::EnvVarNotFound { var }),
            None => Ok(expanded.into_owned()),
        }
    }

    /// Validate configuration values.
    fn validate(&self, config: &SeshConfig) -> Result<(), ConfigError> {
        if config.runner.timeout_secs == Some(0) {
            return Err(ConfigError::ValidationError {
                message: "runner.timeout_secs must be greater than 0".to_string(),
            });
        }

        if sesh_log::LogLevel::parse(&config.log.level).is_none() {
            return Err(ConfigError::ValidationError {
                message: format!("log.level `{}` is not a known level", config.log.level),
            });
        }

        if !LOG_FORMATS.contains(&config.log.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "log.format must be one of {}, got `{}`",
                    LOG_FORMATS.join(", "),
                    config.log.format
                ),
            });
        }

        Ok(())
    }

    /// Save configuration to `.sesh/config.yaml`.
    pub fn save(&self, config: &SeshConfig) -> Result<(), ConfigError> {
        let config_dir = self.base_path.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir)?;

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(config_dir.join(CONFIG_FILE), yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}
