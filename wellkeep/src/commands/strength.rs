//! `wellkeep strength`: score a password.

use anyhow::{Context, Result};

use wellkeep_core::strength::check_password_strength_with;
use wellkeep_core::{PasswordStrength, SecurityPolicy};

use crate::cli::StrengthCommand;

pub fn run_strength(cmd: &StrengthCommand, policy: &SecurityPolicy) -> Result<bool> {
    let password = match &cmd.password {
        Some(p) => p.clone(),
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let result = check_password_strength_with(&password, &policy.common_passwords);
    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render(&result));
    }
    Ok(true)
}

/// Plain-text report: a score line followed by one feedback line each.
pub fn render(result: &PasswordStrength) -> String {
    let label = result.strength.map(|s| s.to_string()).unwrap_or_else(|| "none".to_string());
    let mut out = format!("Score: {}/5 ({})\n", result.score, label);
    for item in &result.feedback {
        out.push_str(&format!("  - {}\n", item));
    }
    out
}
