//! CLI module for guestlist
//!
//! Provides command-line interface for:
//! - serve: Apply the schema and run the HTTP API
//! - migrate: Apply the schema and exit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, DatabaseArgs, ServeArgs};
pub use commands::{migrate, run, run_command, serve};
pub use errors::{CliError, CliResult};
