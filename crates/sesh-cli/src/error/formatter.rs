//! Error formatting for CLI output.

use std::fmt::Write as FmtWrite;

use console::{style, StyledObject};

use crate::error::CliError;

/// Error output formatter
pub struct ErrorFormatter {
    colors: bool,
    verbose: bool,
}

impl ErrorFormatter {
    pub fn new() -> Self {
        Self {
            colors: console::colors_enabled_stderr(),
            verbose: false,
        }
    }

    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn paint<D>(&self, value: D) -> StyledObject<D> {
        style(value).force_styling(self.colors)
    }

    /// Format and print an error
    pub fn print(&self, error: &CliError) {
        eprint!("{}", self.format(error));
    }

    /// Format an error to a string
    pub fn format(&self, error: &CliError) -> String {
        let mut output = String::new();

        let prefix = self.paint(format!("error[{}]:", error.code())).red().bold();
        let _ = writeln!(output, "{prefix} {error}");

        if self.verbose {
            self.format_source_chain(&mut output, error);
        }

        self.format_context(&mut output, error);

        if let Some(hint) = error.hint() {
            let label = self.paint("hint:").cyan().bold();
            let _ = writeln!(output, "\n{label} {hint}");
        }

        let suggestions = error.suggestions();
        if !suggestions.is_empty() {
            let label = self.paint("suggestions:").yellow().bold();
            let _ = writeln!(output, "\n{label}");
            for suggestion in suggestions {
                let _ = writeln!(output, "  - {suggestion}");
            }
        }

        output
    }

    /// Format as JSON
    pub fn format_json(&self, error: &CliError) -> String {
        let json = serde_json::json!({
            "error": {
                "code": error.code(),
                "exit_code": error.exit_status(),
                "message": error.to_string(),
                "hint": error.hint(),
                "suggestions": error.suggestions(),
            }
        });

        serde_json::to_string_pretty(&json).unwrap_or_else(|_| error.to_string())
    }

    fn format_source_chain(&self, output: &mut String, error: &CliError) {
        use std::error::Error;

        let Some(source) = error.source() else {
            return;
        };

        let label = self.paint("caused by:").dim();
        let _ = writeln!(output, "\n{label}");
        let _ = writeln!(output, "  {source}");

        let mut current = source.source();
        let mut depth = 1;
        while let Some(src) = current {
            let _ = writeln!(output, "  {depth}: {src}");
            current = src.source();
            depth += 1;
        }
    }

    fn format_context(&self, output: &mut String, error: &CliError) {
        match error {
            CliError::Command { command, .. } if !command.is_empty() => {
                let label = self.paint("command:").dim();
                let _ = writeln!(output, "\n  {label} {command}");
            }
            _ => {}
        }
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesh_config::ConfigError;
    use sesh_core::SessionError;

    fn plain() -> ErrorFormatter {
        ErrorFormatter::new().colors(false)
    }

    fn config_error() -> CliError {
        CliError::from(ConfigError::ValidationError {
            message: "runner.timeout_secs must be greater than 0".to_string(),
        })
    }

    #[test]
    fn test_error_formatter() {
        let output = plain().format(&config_error());

        assert!(output.starts_with("error[E001]: Configuration error: validation error"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_colored_output() {
        let output = ErrorFormatter::new()
            .colors(true)
            .format(&config_error());
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn test_error_json_format() {
        let json = plain().format_json(&CliError::not_found("task", "fmt"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["error"]["code"], "E005");
        assert_eq!(value["error"]["exit_code"], 6);
        assert_eq!(value["error"]["message"], "task not found: fmt");
    }

    #[test]
    fn test_error_with_hint() {
        let output = plain().format(&config_error());

        assert!(output.contains("hint: Check .sesh/config.yaml"));
    }

    #[test]
    fn test_error_with_suggestions() {
        let error = CliError::unknown_task("formt", &["format"]);
        let output = plain().format(&error);

        assert!(output.contains("suggestions:"));
        assert!(output.contains("- Did you mean 'format'?"));
    }

    #[test]
    fn test_command_context_and_chain() {
        let error = CliError::from(SessionError::CommandFailed {
            command: "isort npblob tests noxfile.py".into(),
            exit_code: 1,
            stderr: String::new(),
        });

        let output = plain().verbose(true).format(&error);
        assert!(output.contains("command: isort npblob tests noxfile.py"));
        assert!(output.contains("caused by:"));

        let output = plain().format(&error);
        assert!(!output.contains("caused by:"));
    }
}
