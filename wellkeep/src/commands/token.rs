//! `wellkeep token`: print a fresh random token.

use anyhow::Result;
use log::debug;

use wellkeep_core::{generate_csrf_token, generate_session_id};

use crate::cli::TokenCommand;

pub fn run_token(cmd: &TokenCommand) -> Result<bool> {
    let token = if cmd.session {
        debug!("Generating session id.");
        generate_session_id()
    } else {
        debug!("Generating CSRF token.");
        generate_csrf_token()
    };
    println!("{}", token);
    Ok(true)
}
