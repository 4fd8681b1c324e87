//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{ArgAction, ColorChoice, Parser, Subcommand, ValueHint};
use sesh_config::{vars, ConfigLoader, Environment, SeshConfig};
use sesh_core::{Project, RunOptions};
use sesh_log::{LogConfig, LogLevel};
use tracing::debug;

use crate::commands::{CompletionsCommand, ListCommand, RunCommand};
use crate::error::CliError;
use crate::help::{AFTER_HELP, AFTER_LONG_HELP};

/// sesh - run project tasks across a polyglot repository
#[derive(Debug, Parser)]
#[command(
    name = "sesh",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true,
    after_help = AFTER_HELP,
    after_long_help = AFTER_LONG_HELP,
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = vars::SESH_CONFIG,
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Run as if started in this directory
    #[arg(
        short = 'C',
        long = "directory",
        global = true,
        value_hint = ValueHint::DirPath
    )]
    pub directory: Option<PathBuf>,

    /// When to use terminal colors
    #[arg(long, global = true, default_value = "auto", value_enum)]
    pub color: ColorChoice,

    /// Output format
    #[arg(long, global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one or more tasks in order
    Run(RunCommand),

    /// List the tasks available in the current directory
    #[command(visible_alias = "ls")]
    List(ListCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Color decision forced by `--color` or `NO_COLOR`, if any.
    fn color_override(&self) -> Option<bool> {
        match self.color {
            ColorChoice::Always => Some(true),
            ColorChoice::Never => Some(false),
            ColorChoice::Auto if Environment::no_color() => Some(false),
            ColorChoice::Auto => None,
        }
    }

    /// Apply `--color` (and `NO_COLOR`) to all styled output.
    pub fn apply_color(&self) -> bool {
        if let Some(enabled) = self.color_override() {
            console::set_colors_enabled(enabled);
            console::set_colors_enabled_stderr(enabled);
        }
        console::colors_enabled_stderr()
    }

    /// Directory sesh was invoked for, canonicalized.
    pub fn invocation_dir(&self) -> Result<PathBuf, CliError> {
        let dir = match &self.directory {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        dir.canonicalize()
            .ok()
            .filter(|dir| dir.is_dir())
            .ok_or_else(|| CliError::not_found("directory", dir.display().to_string()))
    }

    /// Logging configuration: config file, then `SESH_LOG_*`, then `-v`/`-q`.
    pub fn log_config(&self, config: &SeshConfig) -> LogConfig {
        let ansi = self
            .color_override()
            .unwrap_or_else(console::colors_enabled_stderr);
        let log = config.log.to_log_config().merge_env().with_ansi(ansi);
        match (self.quiet, self.verbose) {
            (true, _) => log.with_level(LogLevel::Error),
            (false, 0) => log,
            (false, 1) => log.with_level(LogLevel::Info),
            (false, 2) => log.with_level(LogLevel::Debug),
            (false, _) => log.with_level(LogLevel::Trace),
        }
    }

    /// Execute the selected command
    pub async fn execute(self) -> Result<(), CliError> {
        if let Command::Completions(cmd) = &self.command {
            return cmd.execute();
        }

        let ctx = CommandContext::load(&self)?;
        match &self.command {
            Command::Run(cmd) => cmd.execute(&ctx).await,
            Command::List(cmd) => cmd.execute(&ctx),
            Command::Completions(cmd) => cmd.execute(),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: SeshConfig,
    pub project_root: PathBuf,
    pub invocation_dir: PathBuf,
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: u8,
}

impl CommandContext {
    /// Discover the project, load its environment and configuration, and
    /// install logging.
    pub fn load(cli: &Cli) -> Result<Self, CliError> {
        let invocation_dir = cli.invocation_dir()?;
        let loader = ConfigLoader::discover(&invocation_dir)
            .unwrap_or_else(|| ConfigLoader::new(sesh_tasks::locate_root(&invocation_dir)));
        Environment::init_in(loader.project_root())?;

        let config = match &cli.config {
            Some(path) => loader.load_file(path)?,
            None => loader.load()?,
        };

        sesh_log::init(cli.log_config(&config))?;
        debug!(
            root = %loader.project_root().display(),
            dir = %invocation_dir.display(),
            "project discovered"
        );

        Ok(Self {
            project_root: loader.project_root().to_path_buf(),
            invocation_dir,
            config,
            format: cli.format,
            quiet: cli.quiet,
            verbose: cli.verbose,
        })
    }

    /// Project with every registry, rooted at the discovered root.
    pub fn project(&self) -> Result<Arc<Project>, CliError> {
        Ok(Arc::new(sesh_tasks::project(&self.project_root)?))
    }

    /// Options applied to every command of a run.
    pub fn run_options(&self) -> RunOptions {
        let runner = &self.config.runner;
        let options = RunOptions::new()
            .echo_commands(runner.echo_commands && !self.quiet)
            .stdout_to_stderr(self.format == OutputFormat::Json)
            .envs(runner.env.clone());
        match runner.timeout() {
            Some(timeout) => options.timeout(timeout),
            None => options.no_timeout(),
        }
    }

    /// Invocation directory relative to the project root, `.` for the root.
    pub fn relative_dir(&self) -> String {
        relative_to(&self.invocation_dir, &self.project_root)
    }
}

fn relative_to(dir: &Path, root: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.display().to_string(),
        Err(_) => dir.display().to_string(),
    }
}
