//! In-memory command runner for tests.

use crate::command::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::{SessionError, SessionResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted result for a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit 0 with no output.
    Success,
    /// Exit 0 and print the given stdout.
    Stdout(String),
    /// Exit with the given non-zero code.
    Exit(i32),
    /// The program is not installed.
    NotFound,
    /// The program hangs past its timeout.
    Timeout,
}

/// Records every command it is asked to run and answers from a script.
///
/// Programs without a scripted outcome succeed.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    outcomes: HashMap<String, Outcome>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl RecordingRunner {
    /// Runner where every program succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome for `program`.
    pub fn with(mut self, program: impl Into<String>, outcome: Outcome) -> Self {
        self.outcomes.insert(program.into(), outcome);
        self
    }

    /// Every spec received, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Program names received, in order.
    pub fn programs(&self) -> Vec<String> {
        self.calls().into_iter().map(|spec| spec.program).collect()
    }

    /// Full argument vectors received, in order.
    pub fn argvs(&self) -> Vec<Vec<String>> {
        self.calls()
            .iter()
            .map(|spec| spec.argv().into_iter().map(String::from).collect())
            .collect()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, spec: &CommandSpec) -> SessionResult<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(spec.clone());

        match self.outcomes.get(&spec.program).cloned().unwrap_or(Outcome::Success) {
            Outcome::Success => Ok(CommandOutput::default()),
            Outcome::Stdout(stdout) => Ok(CommandOutput {
                stdout,
                ..Default::default()
            }),
            Outcome::Exit(exit_code) => Ok(CommandOutput {
                exit_code,
                ..Default::default()
            }),
            Outcome::NotFound => Err(SessionError::CommandNotFound {
                program: spec.program.clone(),
            }),
            Outcome::Timeout => Err(SessionError::Timeout {
                command: spec.command_line(),
                duration: spec.timeout.unwrap_or(Duration::ZERO),
            }),
        }
    }
}
