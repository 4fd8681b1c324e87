//! Test utilities for sesh crates.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: Mutex<()> = Mutex::new(());
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary project root containing the given subdirectories.
pub fn temp_project(dirs: &[&str]) -> TempDir {
    let root = temp_dir();
    for dir in dirs {
        std::fs::create_dir_all(root.path().join(dir)).expect("Failed to create project dir");
    }
    root
}

/// Writes `.sesh/config.yaml` under `root` and returns its path.
pub fn write_config(root: &Path, yaml: &str) -> PathBuf {
    let dir = root.join(".sesh");
    std::fs::create_dir_all(&dir).expect("Failed to create .sesh dir");
    let path = dir.join("config.yaml");
    std::fs::write(&path, yaml).expect("Failed to write config");
    path
}

/// Serializes tests that change the process working directory.
///
/// A panicking holder does not poison the lock for later tests.
pub fn cwd_lock() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Serializes tests that mutate process environment variables.
pub fn env_lock() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
