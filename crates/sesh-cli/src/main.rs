//! sesh - task runner for polyglot repositories
//!
//! Main entry point for the `sesh` binary.

use std::process::ExitCode;

use clap::Parser;
use sesh_cli::cli::Cli;
use sesh_cli::error::{handle_result, setup_panic_handler};
use sesh_cli::CliError;

fn main() -> ExitCode {
    setup_panic_handler();

    let cli = Cli::parse();
    let colors = cli.apply_color();
    let format = cli.format;
    let verbose = cli.verbose > 0;

    // Commands run one after another; a single thread is enough.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => return handle_result::<()>(Err(e.into()), format, colors, verbose),
    };

    let result = runtime.block_on(async {
        tokio::select! {
            result = cli.execute() => result,
            _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
        }
    });

    handle_result(result, format, colors, verbose)
}
