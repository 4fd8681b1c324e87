//! sesh CLI library
//!
//! Argument parsing, command implementations and error reporting for the
//! `sesh` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod help;
pub mod output;

pub use error::CliError;
