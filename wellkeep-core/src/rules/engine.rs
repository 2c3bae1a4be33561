// wellkeep-core/src/rules/engine.rs
//! Field- and form-level rule evaluation.
//!
//! License: MIT OR APACHE 2.0

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::WellkeepError;
use crate::rules::schema::ValidationSchema;
use crate::rules::{FieldError, NamedRule, Rule};

/// Field name to value. `None` stands for a null or missing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: BTreeMap<String, Option<String>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Option<impl Into<String>>) {
        self.fields.insert(field.into(), value.map(Into::into));
    }

    /// The value of `field`, or `None` when it is absent or null.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Builds form data from a JSON object.
    ///
    /// Strings are taken as-is, `null` becomes `None`, and every other value
    /// (numbers, booleans, nested data) is rendered to its JSON text, the way
    /// a browser form would stringify it.
    pub fn from_json(value: &Value) -> Result<Self, WellkeepError> {
        let Value::Object(map) = value else {
            return Err(WellkeepError::InvalidForm(json_kind(value).to_string()));
        };

        let fields = map
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                };
                (k.clone(), rendered)
            })
            .collect();
        Ok(Self { fields })
    }

    pub fn from_json_str(text: &str) -> Result<Self, WellkeepError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fields = iter
            .into_iter()
            .map(|(k, v)| (k.into(), Some(v.into())))
            .collect();
        Self { fields }
    }
}

/// The result of validating a whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    /// At most one error per field: the first rule that failed.
    pub errors: BTreeMap<String, FieldError>,
}

impl ValidationResult {
    pub fn error_for(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Fields whose result is an advisory rather than a rejection.
    pub fn advisories(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors
            .iter()
            .filter(|(_, e)| e.is_advisory())
            .map(|(k, e)| (k.as_str(), e))
    }
}

/// Runs `rules` in order against `value` and returns the first failure.
pub fn evaluate_field(value: Option<&str>, rules: &[Rule]) -> Option<FieldError> {
    evaluate_with_form(value, rules, None)
}

fn evaluate_with_form(value: Option<&str>, rules: &[Rule], form: Option<&FormData>) -> Option<FieldError> {
    for rule in rules {
        let error = match rule {
            Rule::Named(named @ NamedRule::ConfirmPassword(reference)) => {
                // Inside a form, a reference naming a sibling field compares against that field.
                let sibling = form
                    .filter(|f| f.contains(reference))
                    .map(|f| f.get(reference).unwrap_or(""));
                named.check(value, sibling)
            }
            Rule::Named(named) => named.check(value, None),
            Rule::Custom(validator) => validator(value),
            Rule::Record(record) => (record.validator)(value),
        };

        if let Some(error) = error {
            debug!("Rule '{}' failed.", rule.describe());
            return Some(error);
        }
    }
    None
}

/// Applies every schema entry to the form and collects one error per failing field.
pub fn evaluate_form(form: &FormData, schema: &ValidationSchema) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for (field, rules) in schema.iter() {
        if let Some(error) = evaluate_with_form(form.get(field), rules, Some(form)) {
            debug!("Field '{}' failed validation.", field);
            errors.insert(field.to_string(), error);
        }
    }

    debug!(
        "Form validated: {} field(s) checked, {} error(s).",
        schema.len(),
        errors.len()
    );

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::messages;
    use serde_json::json;

    fn rules(names: &[&str]) -> Vec<Rule> {
        names.iter().map(|n| n.parse::<Rule>().unwrap()).collect()
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let rs = rules(&["min:10", "email", "max:2"]);
        let err = evaluate_field(Some("abc"), &rs).unwrap();
        assert_eq!(err.message(), messages::min_length(10));
    }

    #[test]
    fn test_later_rules_are_not_consulted_after_failure() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let rs = vec![
            Rule::Named(NamedRule::Required),
            Rule::custom(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                None::<String>
            }),
        ];
        assert!(evaluate_field(None, &rs).is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(evaluate_field(Some("x"), &rs).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_custom_and_record_rules() {
        let rs = vec![
            Rule::custom(|v: Option<&str>| v.filter(|s| s.contains(' ')).map(|_| "no spaces")),
            Rule::record("not-admin", |v: Option<&str>| {
                (v == Some("admin")).then(|| "reserved name".to_string())
            }),
        ];
        assert_eq!(evaluate_field(Some("a b"), &rs).unwrap().message(), "no spaces");
        assert_eq!(evaluate_field(Some("admin"), &rs).unwrap().message(), "reserved name");
        assert!(evaluate_field(Some("alice"), &rs).is_none());
    }

    #[test]
    fn test_empty_rule_list_passes() {
        assert!(evaluate_field(None, &[]).is_none());
    }

    #[test]
    fn test_form_reports_only_failing_fields() {
        let form: FormData = [("a", ""), ("b", "x")].into_iter().collect();
        let schema = ValidationSchema::new()
            .field("a", rules(&["required"]))
            .field("b", rules(&["required"]));

        let result = evaluate_form(&form, &schema);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.error_for("a").unwrap().message(), messages::REQUIRED);
        assert!(result.error_for("b").is_none());
    }

    #[test]
    fn test_missing_field_is_treated_as_absent() {
        let form = FormData::new();
        let schema = ValidationSchema::new()
            .field("email", rules(&["required", "email"]))
            .field("website", rules(&["url"]));
        let result = evaluate_form(&form, &schema);
        assert_eq!(result.errors.len(), 1);
        assert!(result.error_for("email").is_some());
    }

    #[test]
    fn test_confirm_password_uses_sibling_field_in_forms() {
        let schema = ValidationSchema::new().field("confirm", rules(&["confirmPassword:password"]));

        let matching: FormData = [("password", "Secret123"), ("confirm", "Secret123")].into_iter().collect();
        assert!(evaluate_form(&matching, &schema).is_valid);

        let mismatched: FormData = [("password", "Secret123"), ("confirm", "Secret124")].into_iter().collect();
        let result = evaluate_form(&mismatched, &schema);
        assert_eq!(result.error_for("confirm").unwrap().message(), messages::PASSWORD_MISMATCH);

        // Without a sibling named "password", the reference is a literal.
        let literal: FormData = [("confirm", "password")].into_iter().collect();
        assert!(evaluate_form(&literal, &schema).is_valid);
    }

    #[test]
    fn test_advisories_are_listed_separately() {
        let schema = ValidationSchema::new()
            .field("text", rules(&["crisisDetection"]))
            .field("mood", rules(&["moodRating"]));
        let form: FormData = [("text", "我不想活了"), ("mood", "12")].into_iter().collect();
        let result = evaluate_form(&form, &schema);
        assert!(!result.is_valid);
        let advisories: Vec<&str> = result.advisories().map(|(f, _)| f).collect();
        assert_eq!(advisories, vec!["text"]);
    }

    #[test]
    fn test_form_data_from_json() {
        let form = FormData::from_json(&json!({
            "name": "Ana",
            "age": 30,
            "subscribed": true,
            "nickname": null
        }))
        .unwrap();
        assert_eq!(form.get("name"), Some("Ana"));
        assert_eq!(form.get("age"), Some("30"));
        assert_eq!(form.get("subscribed"), Some("true"));
        assert_eq!(form.get("nickname"), None);
        assert!(form.contains("nickname"));

        assert!(matches!(
            FormData::from_json(&json!(["not", "an", "object"])),
            Err(WellkeepError::InvalidForm(_))
        ));
    }

    #[test]
    fn test_validation_result_json_shape() {
        let result = ValidationResult {
            is_valid: false,
            errors: [("a".to_string(), FieldError::from("bad"))].into_iter().collect(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({"isValid": false, "errors": {"a": "bad"}}));
    }
}
