//! CLI module for Namhatta
//!
//! Provides command-line interface for:
//! - serve: Seed the directory, open the audit journal, and serve the HTTP API
//! - validate: Check configuration, seed, and journal without serving

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{boot, run, run_command, serve, validate, Config, ValidationSummary};
pub use errors::{CliError, CliErrorCode, CliResult};
