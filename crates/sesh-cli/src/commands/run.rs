//! `sesh run`

use std::sync::Arc;

use clap::Parser;
use sesh_core::{CommandRunner, ProcessRunner};
use sesh_log::spans::Timer;
use tracing::info;

use crate::cli::{CommandContext, OutputFormat};
use crate::error::CliError;
use crate::output::{print_output, RunSummary, TaskOutcome};

/// Run tasks in the order given, stopping at the first failure
#[derive(Debug, Parser)]
pub struct RunCommand {
    /// Tasks to run
    #[arg(required = true, num_args = 1..)]
    pub tasks: Vec<String>,
}

impl RunCommand {
    pub async fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let project = ctx.project()?;
        let registry = project.registry_for(&ctx.invocation_dir)?;

        // Reject unknown names before anything runs.
        if let Some(unknown) = self.tasks.iter().find(|task| !registry.contains(task)) {
            return Err(CliError::unknown_task(unknown, &registry.names()));
        }

        let runner: Arc<dyn CommandRunner> = Arc::new(ProcessRunner::new());
        let mut summary = RunSummary {
            directory: ctx.relative_dir(),
            tasks: Vec::with_capacity(self.tasks.len()),
            warnings: Vec::new(),
        };

        for task in &self.tasks {
            let timer = Timer::start("run");
            let session = project
                .run(&ctx.invocation_dir, task, Arc::clone(&runner), ctx.run_options())
                .await?;
            let duration = timer.finish();

            info!(task = %task, duration_ms = %duration.as_millis(), "task succeeded");
            summary.warnings.extend(session.warnings());
            summary.tasks.push(TaskOutcome {
                name: task.clone(),
                status: "success".to_string(),
                duration_ms: duration.as_millis(),
            });

            if ctx.format == OutputFormat::Text && !ctx.quiet {
                eprintln!(
                    "{} Task {task} was successful.",
                    console::style("sesh >").cyan().bold().for_stderr()
                );
            }
        }

        if ctx.format == OutputFormat::Json {
            print_output(ctx.format, &summary)?;
        }
        Ok(())
    }
}
