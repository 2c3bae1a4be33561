// wellkeep-core/tests/policy_integration_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;
use test_log::test; // Captures core log output per test

use wellkeep_core::config::{self, SecurityPolicy};
use wellkeep_core::{evaluate_form, FormData, PolicyScanner, RateLimiter, SchemaMode, ValidationSchema};

fn write_policy(yaml: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_default_policy() {
    let policy = SecurityPolicy::load_default().unwrap();
    assert_eq!(policy.input.max_input_length, 5000);
    assert_eq!(policy.rate_limit.max_attempts, 5);
    assert_eq!(policy.uploads.allowed_file_types.len(), 4);
    assert!(policy.schemas.contains_key("journal"));
}

#[test]
fn test_load_from_file_merges_over_default() -> Result<()> {
    let file = write_policy(
        r#"
blocked_words:
  - darn
input:
  max_input_length: 280
schemas:
  feedback:
    comment: [required, "max:280"]
"#,
    )?;
    let policy = SecurityPolicy::load_from_file(file.path())?;

    assert_eq!(policy.blocked_words, vec!["darn".to_string()]);
    assert_eq!(policy.inspect_options().max_length, 280);
    // Untouched sections keep their defaults.
    assert_eq!(policy.common_passwords, config::default_policy().common_passwords);
    assert!(policy.schema("register", SchemaMode::Strict)?.is_some());

    let feedback = policy.schema("feedback", SchemaMode::Strict)?.unwrap();
    assert_eq!(feedback.rules_for("comment").map(|r| r.len()), Some(2));

    let scanner = PolicyScanner::new(&policy)?;
    assert_eq!(scanner.filter("Darn!"), "****!");
    Ok(())
}

#[test]
fn test_crisis_rule_keywords_follow_the_policy_file() -> Result<()> {
    let file = write_policy(
        r#"
crisis_keywords:
  rule: ["give up"]
"#,
    )?;
    let policy = SecurityPolicy::load_from_file(file.path())?;
    let journal = policy.schema("journal", SchemaMode::Strict)?.unwrap();

    let form: FormData = [("mood", "4"), ("text", "I just want to give up on everything")]
        .into_iter()
        .collect();
    let result = evaluate_form(&form, &journal);
    assert!(!result.is_valid);
    assert!(result.error_for("text").is_some_and(|e| e.is_advisory()));

    // The replaced default terms no longer trigger the rule.
    let form: FormData = [("mood", "4"), ("text", "最近我总是想死，怎么办")].into_iter().collect();
    assert!(evaluate_form(&form, &journal).is_valid);

    // Schemas loaded from their own file pick up the policy terms once bound.
    let schema = policy.bind_schema(ValidationSchema::from_yaml_str("note: [crisisDetection]", SchemaMode::Strict)?)?;
    let form: FormData = [("note", "I might give up")].into_iter().collect();
    assert!(!evaluate_form(&form, &schema).is_valid);
    Ok(())
}

#[test]
fn test_unknown_top_level_key_is_rejected() -> Result<()> {
    let file = write_policy("blocked_wrds: [x]\n")?;
    let err = SecurityPolicy::load_from_file(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse policy file"));
    Ok(())
}

#[test]
fn test_schema_with_unknown_rule_fails_validation() -> Result<()> {
    let file = write_policy(
        r#"
schemas:
  broken:
    name: [required, shout]
"#,
    )?;
    let err = SecurityPolicy::load_from_file(file.path()).unwrap_err();
    let rendered = format!("{:#}", err);
    assert!(rendered.contains("Invalid policy file"), "{}", rendered);
    assert!(rendered.contains("shout"), "{}", rendered);
    Ok(())
}

#[test]
fn test_schema_file_modes() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    writeln!(file, "nickname: [required, sparkle, \"max:20\"]")?;

    assert!(ValidationSchema::load_from_file(file.path(), SchemaMode::Strict).is_err());

    let lenient = ValidationSchema::load_from_file(file.path(), SchemaMode::Lenient)?;
    assert_eq!(lenient.rules_for("nickname").map(|r| r.len()), Some(2));
    Ok(())
}

#[test]
fn test_rate_limiter_from_policy() -> Result<()> {
    let file = write_policy("rate_limit:\n  max_attempts: 1\n  window_ms: 1000\n")?;
    let policy = SecurityPolicy::load_from_file(file.path())?;
    let mut limiter = RateLimiter::from_policy(&policy.rate_limit);
    assert!(limiter.is_allowed("login"));
    assert!(!limiter.is_allowed("login"));
    Ok(())
}
