//! `sesh list`

use clap::Parser;

use crate::cli::CommandContext;
use crate::error::CliError;
use crate::output::{print_output, TaskEntry, TaskList};

/// List the tasks registered for the invocation directory
#[derive(Debug, Parser)]
pub struct ListCommand {}

impl ListCommand {
    pub fn execute(&self, ctx: &CommandContext) -> Result<(), CliError> {
        let project = ctx.project()?;
        let registry = project.registry_for(&ctx.invocation_dir)?;

        let list = TaskList {
            directory: ctx.relative_dir(),
            tasks: registry
                .tasks()
                .map(|task| TaskEntry {
                    name: task.name().to_string(),
                    description: task.description().to_string(),
                    backend: task.backend().to_string(),
                })
                .collect(),
        };

        print_output(ctx.format, &list)
    }
}
