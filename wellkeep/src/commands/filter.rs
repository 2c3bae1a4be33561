//! `wellkeep filter`: mask blocked words and flag crisis language.

use std::io::{self, Write};

use anyhow::Result;

use wellkeep_core::{PolicyScanner, SecurityPolicy};

use super::{read_input, warn_msg};
use crate::cli::FilterCommand;

pub fn run_filter(cmd: &FilterCommand, policy: &SecurityPolicy, quiet: bool) -> Result<bool> {
    let input = read_input(cmd.input_file.as_deref())?;
    let scanner = PolicyScanner::new(policy)?;

    let filtered = scanner.filter(&input);
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", filtered)?;
    if !filtered.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    if scanner.detects_crisis(&input) && !quiet {
        warn_msg("This text contains crisis language. Consider reaching out to a support line or someone you trust.");
    }
    Ok(true)
}
