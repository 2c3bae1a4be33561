// wellkeep/src/main.rs
//! Wellkeep entry point.
//!
//! Exit codes: 0 on success, 1 when the input did not pass (invalid form,
//! suspicious text, missing store entry), 2 on errors.

use std::process::ExitCode;

use clap::Parser;

use wellkeep::cli::Cli;
use wellkeep::commands::error_msg;
use wellkeep::logger;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(logger::level_for_flags(cli.quiet, cli.debug));

    match wellkeep::run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error_msg(format!("{:#}", e));
            ExitCode::from(2)
        }
    }
}
