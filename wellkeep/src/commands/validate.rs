//! `wellkeep validate`: evaluate a JSON form against a schema.

use std::fs;
use std::io;

use anyhow::{anyhow, Context, Result};
use log::info;

use wellkeep_core::{evaluate_form, FormData, SchemaMode, SecurityPolicy, ValidationResult, ValidationSchema};

use super::{stderr_supports_color, success_msg, warn_msg};
use crate::cli::ValidateCommand;
use crate::ui::output_format;

pub fn run_validate(cmd: &ValidateCommand, policy: &SecurityPolicy, quiet: bool) -> Result<bool> {
    let mode = if cmd.lenient { SchemaMode::Lenient } else { SchemaMode::Strict };
    let schema = resolve_schema(cmd, policy, mode)?;

    let text = fs::read_to_string(&cmd.form)
        .with_context(|| format!("Failed to read form file: {}", cmd.form.display()))?;
    let form = FormData::from_json_str(&text)
        .with_context(|| format!("Invalid form file: {}", cmd.form.display()))?;

    info!("Validating {} field(s) against {} schema rule set(s).", form.len(), schema.len());
    let result = evaluate_form(&form, &schema);

    println!("{}", serde_json::to_string_pretty(&result)?);
    if !quiet {
        print_summary(&result);
    }
    Ok(result.is_valid)
}

fn resolve_schema(cmd: &ValidateCommand, policy: &SecurityPolicy, mode: SchemaMode) -> Result<ValidationSchema> {
    if let Some(path) = &cmd.schema {
        let schema = ValidationSchema::load_from_file(path, mode)?;
        return Ok(policy.bind_schema(schema)?);
    }
    let name = cmd
        .preset
        .as_deref()
        .ok_or_else(|| anyhow!("Either --schema or --preset is required"))?;
    policy.schema(name, mode)?.ok_or_else(|| {
        let known: Vec<&str> = policy.schemas.keys().map(String::as_str).collect();
        anyhow!("Unknown preset '{}'. Available presets: {}", name, known.join(", "))
    })
}

fn print_summary(result: &ValidationResult) {
    if result.is_valid {
        success_msg("Form is valid.");
        return;
    }

    let plain: Vec<(&str, &str)> = result
        .errors
        .iter()
        .filter(|(_, e)| !e.is_advisory())
        .map(|(field, e)| (field.as_str(), e.message()))
        .collect();
    if !plain.is_empty() {
        let _ = output_format::print_field_errors(&mut io::stderr(), plain, stderr_supports_color());
    }
    for (field, advisory) in result.advisories() {
        warn_msg(format!("Field '{}' needs attention: {}", field, advisory.message()));
    }
}
