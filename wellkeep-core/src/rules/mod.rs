//! Declarative validation rules for form fields.
//!
//! A [`Rule`] is either one of the built-in [`NamedRule`]s, a caller-supplied
//! closure, or a labelled record wrapping such a closure. Rules are evaluated
//! in order and evaluation of a field stops at the first failure
//! (see [`evaluate_field`]); [`evaluate_form`] applies a
//! [`ValidationSchema`] to a whole [`FormData`] mapping.
//!
//! Most failures are plain messages. A few journaling rules instead return
//! an [`Advisory`], a structured result that asks the UI to do something
//! (show crisis support) rather than reject the input.
//!
//! License: MIT OR APACHE 2.0

pub mod engine;
pub mod mental_health;
pub mod messages;
pub mod named;
pub mod schema;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use engine::{evaluate_field, evaluate_form, FormData, ValidationResult};
pub use named::NamedRule;
pub use schema::{parse_rules, parse_rules_lenient, SchemaMode, ValidationSchema};

/// A caller-supplied check. Returns `None` when the value is acceptable.
pub type Validator = Arc<dyn Fn(Option<&str>) -> Option<FieldError> + Send + Sync>;

/// What the UI should do in response to an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UiAction {
    ShowCrisisSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryKind {
    Crisis,
}

/// A non-blocking result carrying a UI directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    #[serde(rename = "type")]
    pub kind: AdvisoryKind,
    pub message: String,
    pub action: UiAction,
}

impl Advisory {
    pub fn crisis_support(message: impl Into<String>) -> Self {
        Self {
            kind: AdvisoryKind::Crisis,
            message: message.into(),
            action: UiAction::ShowCrisisSupport,
        }
    }
}

/// The outcome of a failing rule.
///
/// Serializes as a bare string for `Message` and as
/// `{"type", "message", "action"}` for `Advisory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldError {
    Message(String),
    Advisory(Advisory),
}

impl FieldError {
    pub fn message(&self) -> &str {
        match self {
            FieldError::Message(m) => m,
            FieldError::Advisory(a) => &a.message,
        }
    }

    pub fn is_advisory(&self) -> bool {
        matches!(self, FieldError::Advisory(_))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<String> for FieldError {
    fn from(message: String) -> Self {
        FieldError::Message(message)
    }
}

impl From<&str> for FieldError {
    fn from(message: &str) -> Self {
        FieldError::Message(message.to_string())
    }
}

impl From<Advisory> for FieldError {
    fn from(advisory: Advisory) -> Self {
        FieldError::Advisory(advisory)
    }
}

/// A validator with a label, the record form of a custom rule.
#[derive(Clone)]
pub struct RuleRecord {
    pub label: Option<String>,
    pub validator: Validator,
}

impl fmt::Debug for RuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRecord")
            .field("label", &self.label)
            .field("validator", &"<fn>")
            .finish()
    }
}

#[derive(Clone)]
pub enum Rule {
    Named(NamedRule),
    Custom(Validator),
    Record(RuleRecord),
}

impl Rule {
    /// Wraps a closure as a custom rule. The closure may return anything
    /// convertible into a [`FieldError`] (a `String`, a `&str`, an [`Advisory`]).
    pub fn custom<F, E>(f: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<E> + Send + Sync + 'static,
        E: Into<FieldError>,
    {
        Rule::Custom(into_validator(f))
    }

    /// Like [`Rule::custom`], with a label for logs and `Debug` output.
    pub fn record<F, E>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(Option<&str>) -> Option<E> + Send + Sync + 'static,
        E: Into<FieldError>,
    {
        Rule::Record(RuleRecord {
            label: Some(label.into()),
            validator: into_validator(f),
        })
    }

    /// A short identifier for logging.
    pub fn describe(&self) -> String {
        match self {
            Rule::Named(rule) => rule.to_string(),
            Rule::Custom(_) => "<custom>".to_string(),
            Rule::Record(record) => record
                .label
                .clone()
                .unwrap_or_else(|| "<record>".to_string()),
        }
    }
}

fn into_validator<F, E>(f: F) -> Validator
where
    F: Fn(Option<&str>) -> Option<E> + Send + Sync + 'static,
    E: Into<FieldError>,
{
    Arc::new(move |value: Option<&str>| f(value).map(Into::into))
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Named(rule) => f.debug_tuple("Named").field(rule).finish(),
            Rule::Custom(_) => f.write_str("Custom(<fn>)"),
            Rule::Record(record) => f.debug_tuple("Record").field(record).finish(),
        }
    }
}

impl From<NamedRule> for Rule {
    fn from(rule: NamedRule) -> Self {
        Rule::Named(rule)
    }
}

impl std::str::FromStr for Rule {
    type Err = crate::errors::WellkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NamedRule>().map(Rule::Named)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_serializes_untagged() {
        let plain = FieldError::from("bad value");
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#""bad value""#);

        let advisory = FieldError::from(Advisory::crisis_support("reach out"));
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["type"], "crisis");
        assert_eq!(json["action"], "showCrisisSupport");
        assert_eq!(json["message"], "reach out");
    }

    #[test]
    fn test_field_error_deserializes_both_shapes() {
        let plain: FieldError = serde_json::from_str(r#""oops""#).unwrap();
        assert_eq!(plain, FieldError::Message("oops".to_string()));

        let advisory: FieldError = serde_json::from_str(
            r#"{"type":"crisis","message":"m","action":"showCrisisSupport"}"#,
        )
        .unwrap();
        assert!(advisory.is_advisory());
    }

    #[test]
    fn test_describe() {
        assert_eq!(Rule::Named(NamedRule::Min(3)).describe(), "min:3");
        assert_eq!(Rule::custom(|_| None::<String>).describe(), "<custom>");
        assert_eq!(Rule::record("no-spaces", |_| None::<String>).describe(), "no-spaces");
    }
}
