//! Environment variable handling.

use std::env;
use std::path::Path;
use thiserror::Error;

/// Environment variable errors.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to load .env file: {0}")]
    DotenvError(#[from] dotenvy::Error),
}

/// Environment variable names read outside the logging layer.
pub mod vars {
    /// Explicit configuration file, same as `--config`.
    pub const SESH_CONFIG: &str = "SESH_CONFIG";
    /// Disables colored output when set to a non-empty value.
    pub const NO_COLOR: &str = "NO_COLOR";
}

/// Process environment of a sesh invocation.
pub struct Environment;

impl Environment {
    /// Load `.env` then `.env.local` from `dir`.
    ///
    /// Variables already set in the process are never overridden. Missing
    /// files are skipped; malformed ones are an error.
    pub fn init_in(dir: impl AsRef<Path>) -> Result<(), EnvError> {
        let dir = dir.as_ref();
        for name in [".env", ".env.local"] {
            match dotenvy::from_path(dir.join(name)) {
                Ok(()) => {}
                Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Whether colored output was disabled through `NO_COLOR`.
    pub fn no_color() -> bool {
        env::var_os(vars::NO_COLOR).is_some_and(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesh_test_utils::{env_lock, temp_dir};
    use std::fs;

    #[test]
    fn test_init_without_files() {
        let dir = temp_dir();
        assert!(Environment::init_in(dir.path()).is_ok());
    }

    #[test]
    fn test_dotenv_file_loading() {
        let _lock = env_lock();
        let dir = temp_dir();
        fs::write(dir.path().join(".env"), "SESH_DOTENV_A=from_env\nSESH_DOTENV_B=base\n").unwrap();
        fs::write(dir.path().join(".env.local"), "SESH_DOTENV_B=local\n").unwrap();
        env::remove_var("SESH_DOTENV_A");
        env::remove_var("SESH_DOTENV_B");

        Environment::init_in(dir.path()).unwrap();

        assert_eq!(env::var("SESH_DOTENV_A").ok().as_deref(), Some("from_env"));
        // .env.local never overrides what .env already set
        assert_eq!(env::var("SESH_DOTENV_B").ok().as_deref(), Some("base"));

        env::remove_var("SESH_DOTENV_A");
        env::remove_var("SESH_DOTENV_B");
    }

    #[test]
    fn test_process_env_wins_over_dotenv() {
        let _lock = env_lock();
        let dir = temp_dir();
        fs::write(dir.path().join(".env"), "SESH_DOTENV_C=file\n").unwrap();
        env::set_var("SESH_DOTENV_C", "process");

        Environment::init_in(dir.path()).unwrap();

        assert_eq!(env::var("SESH_DOTENV_C").ok().as_deref(), Some("process"));
        env::remove_var("SESH_DOTENV_C");
    }

    #[test]
    fn test_no_color() {
        let _lock = env_lock();
        let saved = env::var_os(vars::NO_COLOR);

        env::set_var(vars::NO_COLOR, "1");
        assert!(Environment::no_color());
        env::set_var(vars::NO_COLOR, "");
        assert!(!Environment::no_color());
        env::remove_var(vars::NO_COLOR);
        assert!(!Environment::no_color());

        if let Some(value) = saved {
            env::set_var(vars::NO_COLOR, value);
        }
    }

    #[test]
    fn test_malformed_dotenv_is_an_error() {
        let dir = temp_dir();
        fs::write(dir.path().join(".env"), "NOT VALID LINE 'unterminated\n").unwrap();

        assert!(matches!(
            Environment::init_in(dir.path()),
            Err(EnvError::DotenvError(_))
        ));
    }
}
