//! Command implementations.

mod completions;
mod list;
mod run;

pub use completions::CompletionsCommand;
pub use list::ListCommand;
pub use run::RunCommand;
