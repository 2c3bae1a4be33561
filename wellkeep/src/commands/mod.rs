//! Subcommand implementations and the helpers they share.

pub mod filter;
pub mod inspect;
pub mod store;
pub mod strength;
pub mod token;
pub mod validate;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;

use wellkeep_core::SecurityPolicy;

use crate::cli::{Cli, Commands};
use crate::ui::output_format;

/// Runs the parsed command line. `Ok(false)` means the command ran but the
/// input did not pass (invalid form, suspicious text, missing entry).
pub fn run(cli: Cli) -> Result<bool> {
    let policy = load_policy(cli.policy.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Validate(cmd) => validate::run_validate(&cmd, &policy, quiet),
        Commands::Inspect(cmd) => inspect::run_inspect(&cmd, &policy),
        Commands::Filter(cmd) => filter::run_filter(&cmd, &policy, quiet),
        Commands::Strength(cmd) => strength::run_strength(&cmd, &policy),
        Commands::Token(cmd) => token::run_token(&cmd),
        Commands::Store(cmd) => store::run_store(&cmd, &policy, quiet),
    }
}

/// The built-in policy, or the built-in policy merged with `path`.
pub fn load_policy(path: Option<&Path>) -> Result<SecurityPolicy> {
    match path {
        Some(path) => SecurityPolicy::load_from_file(path),
        None => SecurityPolicy::load_default(),
    }
}

/// Reads the whole input file, or stdin when no file is given.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!("Reading input from file: {}", path.display());
            fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
        }
        None => {
            debug!("Reading input from stdin.");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color());
}

/// Helper for printing success messages to stderr.
pub fn success_msg(msg: impl AsRef<str>) {
    let _ = output_format::print_success_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color());
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color());
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color());
}

pub fn stderr_supports_color() -> bool {
    io::stderr().is_terminal()
}
