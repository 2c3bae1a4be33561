//! inspect.rs - Length, XSS and SQL-injection inspection of free-text input.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use serde::{Deserialize, Serialize};

use super::html::{escape_html, strip_dangerous};
use super::patterns::{SQL_INJECTION_PATTERNS, XSS_PATTERNS};
use crate::config::DEFAULT_MAX_INPUT_LENGTH;

pub const SUSPICIOUS_CONTENT: &str = "Suspicious content detected, please check your input";
pub const SUSPICIOUS_QUERY: &str = "Suspicious query content detected";

pub fn too_long(max_length: usize) -> String {
    format!("Content must not exceed {} characters", max_length)
}

/// Options for [`inspect_input`]. Missing fields take their defaults when
/// deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InspectOptions {
    pub max_length: usize,
    pub allow_html: bool,
    #[serde(rename = "checkXSS")]
    pub check_xss: bool,
    #[serde(rename = "checkSQLInjection")]
    pub check_sql_injection: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_INPUT_LENGTH,
            allow_html: false,
            check_xss: true,
            check_sql_injection: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub sanitized: String,
    /// Names of the heuristics that matched, in check order.
    pub findings: Vec<String>,
}

impl InspectReport {
    fn clean(sanitized: String) -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            sanitized,
            findings: Vec::new(),
        }
    }
}

/// Inspects `input` and returns the sanitized text plus any problems found.
///
/// Pattern checks always run against the original input, while sanitization
/// applies to the (possibly truncated) text. The SQL check reports but never
/// alters the sanitized value. When `check_xss` is off the text is returned
/// unescaped.
pub fn inspect_input(input: &str, options: &InspectOptions) -> InspectReport {
    if input.is_empty() {
        return InspectReport::clean(String::new());
    }

    let mut errors = Vec::new();
    let mut findings = Vec::new();

    let mut sanitized = if input.chars().count() > options.max_length {
        errors.push(too_long(options.max_length));
        input.chars().take(options.max_length).collect::<String>()
    } else {
        input.to_string()
    };

    if options.check_xss {
        let hits = XSS_PATTERNS.matching(input);
        if !hits.is_empty() {
            errors.push(SUSPICIOUS_CONTENT.to_string());
            findings.extend(hits.iter().map(|h| h.to_string()));
        }
        sanitized = if options.allow_html {
            strip_dangerous(&sanitized)
        } else {
            escape_html(&sanitized)
        };
    }

    if options.check_sql_injection {
        let hits = SQL_INJECTION_PATTERNS.matching(input);
        if !hits.is_empty() {
            errors.push(SUSPICIOUS_QUERY.to_string());
            findings.extend(hits.iter().map(|h| h.to_string()));
        }
    }

    if !findings.is_empty() {
        debug!("Input of {} chars matched: {}", input.chars().count(), findings.join(", "));
    }

    InspectReport {
        is_valid: errors.is_empty(),
        errors,
        sanitized,
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_input_is_flagged_and_escaped() {
        let report = inspect_input("<script>alert(1)</script>", &InspectOptions::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![SUSPICIOUS_CONTENT.to_string()]);
        assert_eq!(report.sanitized, "&lt;script&gt;alert(1)&lt;&#x2F;script&gt;");
        assert_eq!(report.findings, vec!["script_tag".to_string()]);
    }

    #[test]
    fn test_allow_html_strips_instead_of_escaping() {
        let options = InspectOptions { allow_html: true, ..Default::default() };
        let report = inspect_input("<p>hi</p><script>x()</script>", &options);
        assert!(!report.is_valid);
        assert_eq!(report.sanitized, "<p>hi</p>");
    }

    #[test]
    fn test_clean_text_passes() {
        let report = inspect_input("Went for a walk, felt better.", &InspectOptions::default());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert_eq!(report.sanitized, "Went for a walk, felt better.");
    }

    #[test]
    fn test_empty_input_is_valid() {
        let report = inspect_input("", &InspectOptions::default());
        assert!(report.is_valid);
        assert_eq!(report.sanitized, "");
    }

    #[test]
    fn test_length_is_counted_in_characters() {
        let options = InspectOptions { max_length: 3, ..Default::default() };
        let report = inspect_input("今天很好", &options);
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![too_long(3)]);
        assert_eq!(report.sanitized, "今天很");

        let exact = inspect_input("今天很", &options);
        assert!(exact.is_valid);
    }

    #[test]
    fn test_sql_check_reports_without_changing_output() {
        let report = inspect_input("x' OR 1=1 --", &InspectOptions::default());
        assert!(!report.is_valid);
        assert_eq!(report.errors, vec![SUSPICIOUS_QUERY.to_string()]);
        assert_eq!(report.sanitized, "x&#039; OR 1=1 --");
        assert_eq!(report.findings, vec!["sql_tautology".to_string(), "sql_comment".to_string()]);
    }

    #[test]
    fn test_checks_can_be_disabled() {
        let options = InspectOptions {
            check_xss: false,
            check_sql_injection: false,
            ..Default::default()
        };
        let report = inspect_input("<b>DROP</b>", &options);
        assert!(report.is_valid);
        assert_eq!(report.sanitized, "<b>DROP</b>");
    }

    #[test]
    fn test_xss_check_uses_untruncated_input() {
        let options = InspectOptions { max_length: 4, ..Default::default() };
        let report = inspect_input("abcd<iframe>", &options);
        assert_eq!(report.errors, vec![too_long(4), SUSPICIOUS_CONTENT.to_string()]);
        assert_eq!(report.sanitized, "abcd");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: InspectOptions = serde_json::from_str(r#"{"allowHtml": true, "checkXSS": false}"#).unwrap();
        assert!(options.allow_html);
        assert!(!options.check_xss);
        assert!(options.check_sql_injection);
        assert_eq!(options.max_length, DEFAULT_MAX_INPUT_LENGTH);
    }
}
