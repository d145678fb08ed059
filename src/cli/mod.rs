//! CLI module for catalogdb
//!
//! Provides command-line interface for:
//! - init: Create directory structure
//! - create / update: Build a product version from a JSON request
//! - show: Print history or a single version
//! - delete / restore: Toggle the soft-delete flag

mod args;
mod commands;
mod errors;
mod io;
mod request;

pub use args::{Cli, Command};
pub use commands::{run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use request::{ImageEntryRequest, VersionRequest};
