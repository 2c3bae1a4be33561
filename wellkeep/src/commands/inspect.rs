//! `wellkeep inspect`: run `inspect_input` over a file or stdin.

use anyhow::Result;
use log::info;

use wellkeep_core::{inspect_input, InspectOptions, SecurityPolicy};

use super::read_input;
use crate::cli::InspectCommand;

pub fn run_inspect(cmd: &InspectCommand, policy: &SecurityPolicy) -> Result<bool> {
    let input = read_input(cmd.input_file.as_deref())?;
    let options = options_for(cmd, policy);

    let report = inspect_input(&input, &options);
    info!(
        "Inspected {} characters: {} error(s).",
        input.chars().count(),
        report.errors.len()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(report.is_valid)
}

/// Policy defaults with the command-line switches applied.
pub fn options_for(cmd: &InspectCommand, policy: &SecurityPolicy) -> InspectOptions {
    let mut options = policy.inspect_options();
    if let Some(max_length) = cmd.max_length {
        options.max_length = max_length;
    }
    options.allow_html = cmd.allow_html;
    options.check_xss = !cmd.no_xss;
    options.check_sql_injection = !cmd.no_sql;
    options
}
