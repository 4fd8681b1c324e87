//! Output formatting utilities for CLI commands.

use serde::Serialize;
use std::io::Write;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Trait for types that can be formatted for output
pub trait FormattedOutput {
    fn format_text(&self) -> String;

    fn format_json(&self) -> Result<String, serde_json::Error>
    where
        Self: Serialize,
    {
        serde_json::to_string_pretty(self)
    }
}

/// Render `value` in the requested format
pub fn render<T>(format: OutputFormat, value: &T) -> Result<String, CliError>
where
    T: FormattedOutput + Serialize,
{
    Ok(match format {
        OutputFormat::Text => value.format_text(),
        OutputFormat::Json => value.format_json()?,
    })
}

/// Print formatted output to stdout
pub fn print_output<T>(format: OutputFormat, value: &T) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
{
    write_output(format, value, std::io::stdout().lock())
}

/// Print formatted output to a writer
pub fn write_output<T, W>(format: OutputFormat, value: &T, mut writer: W) -> Result<(), CliError>
where
    T: FormattedOutput + Serialize,
    W: Write,
{
    let output = render(format, value)?;
    writeln!(writer, "{output}")?;
    Ok(())
}

/// One task as shown by `sesh list`
#[derive(Debug, Serialize)]
pub struct TaskEntry {
    pub name: String,
    pub description: String,
    pub backend: String,
}

/// Tasks available in a directory
#[derive(Debug, Serialize)]
pub struct TaskList {
    pub directory: String,
    pub tasks: Vec<TaskEntry>,
}

impl FormattedOutput for TaskList {
    fn format_text(&self) -> String {
        let width = self.tasks.iter().map(|t| t.name.len()).max().unwrap_or(0);
        let mut out = format!("Tasks in {}:", self.directory);
        for task in &self.tasks {
            out.push_str(&format!(
                "\n  * {:width$}  {}",
                console::style(&task.name).cyan(),
                task.description,
                width = width
            ));
        }
        out
    }
}

/// Outcome of one task run
#[derive(Debug, Serialize)]
pub struct TaskOutcome {
    pub name: String,
    pub status: String,
    pub duration_ms: u128,
}

/// Outcome of `sesh run`
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub directory: String,
    pub tasks: Vec<TaskOutcome>,
    pub warnings: Vec<String>,
}

impl FormattedOutput for RunSummary {
    fn format_text(&self) -> String {
        let mut lines: Vec<String> = self
            .tasks
            .iter()
            .map(|t| format!("{} Task {} was successful.", console::style("sesh >").cyan().bold(), t.name))
            .collect();
        if !self.warnings.is_empty() {
            lines.push(format!(
                "{} {} warning(s) reported",
                console::style("sesh >").yellow().bold(),
                self.warnings.len()
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> TaskList {
        TaskList {
            directory: "python".to_string(),
            tasks: vec![
                TaskEntry {
                    name: "format".to_string(),
                    description: "Format the Python sources".to_string(),
                    backend: "none".to_string(),
                },
                TaskEntry {
                    name: "shell_completion".to_string(),
                    description: "Print instructions".to_string(),
                    backend: "none".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_task_list_text() {
        console::set_colors_enabled(false);
        let text = render(OutputFormat::Text, &list()).unwrap();

        assert!(text.starts_with("Tasks in python:"));
        assert!(text.contains("  * format            Format the Python sources"));
        assert!(text.contains("  * shell_completion  Print instructions"));
    }

    #[test]
    fn test_task_list_json() {
        let json = render(OutputFormat::Json, &list()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["directory"], "python");
        assert_eq!(value["tasks"][0]["name"], "format");
        assert_eq!(value["tasks"][1]["backend"], "none");
    }

    #[test]
    fn test_write_output() {
        let summary = RunSummary {
            directory: ".".to_string(),
            tasks: vec![TaskOutcome {
                name: "format".to_string(),
                status: "success".to_string(),
                duration_ms: 12,
            }],
            warnings: vec!["taplo missing".to_string()],
        };
        let mut buf = Vec::new();

        write_output(OutputFormat::Json, &summary, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["tasks"][0]["status"], "success");
        assert_eq!(value["warnings"][0], "taplo missing");
    }
}
