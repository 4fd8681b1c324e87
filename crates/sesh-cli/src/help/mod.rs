//! Help text for the CLI.

pub mod suggestions;

/// Shown after `--help`.
pub const AFTER_HELP: &str = "Run 'sesh <command> --help' for more information on a command.";

/// Shown after `--help` in long form.
pub const AFTER_LONG_HELP: &str = "\
Examples:
  sesh list                      List tasks for the current directory
  sesh run format                Format the whole repository
  sesh -C python run format      Format only the Python package
  sesh run shell_completion      Show how to enable shell completion
  sesh completions zsh           Print a completion script

Projects are configured through .sesh/config.yaml at the project root.";
