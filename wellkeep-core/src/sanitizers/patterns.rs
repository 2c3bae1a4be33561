//! patterns.rs - The compiled heuristic pattern sets.
//!
//! Patterns are compiled once into process-wide sets. Each pattern carries a
//! stable name so inspection reports can say which heuristic fired without
//! echoing user text.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};

/// A single compiled heuristic.
#[derive(Debug)]
pub struct NamedPattern {
    pub name: &'static str,
    pub regex: Regex,
}

/// An ordered collection of heuristics of one family.
#[derive(Debug)]
pub struct PatternSet {
    pub family: &'static str,
    pub patterns: Vec<NamedPattern>,
}

impl PatternSet {
    fn compile(family: &'static str, entries: &[(&'static str, &'static str)]) -> Self {
        let patterns = entries
            .iter()
            .map(|&(name, pattern)| {
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|e| panic!("built-in pattern '{}' is invalid: {}", name, e));
                NamedPattern { name, regex }
            })
            .collect::<Vec<_>>();
        debug!("Compiled {} '{}' patterns.", patterns.len(), family);
        Self { family, patterns }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.regex.is_match(text))
    }

    /// Names of the patterns that match `text`, in declaration order.
    pub fn matching(&self, text: &str) -> Vec<&'static str> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.name)
            .collect()
    }
}

// Word classes are spelled out as ASCII: these heuristics target markup and
// SQL keywords, not natural-language text.
const XSS_SPECS: &[(&str, &str)] = &[
    ("script_tag", r"<script"),
    ("javascript_uri", r"javascript:"),
    ("inline_event_handler", r"on[A-Za-z0-9_]+\s*="),
    ("iframe_tag", r"<iframe"),
    ("object_tag", r"<object"),
    ("embed_tag", r"<embed"),
    ("vbscript_uri", r"vbscript:"),
];

const SQL_SPECS: &[(&str, &str)] = &[
    (
        "sql_keyword",
        r"(?-u:\b)(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE|ALTER|EXEC|UNION)(?-u:\b)",
    ),
    ("sql_tautology", r"(OR|AND)\s+[0-9]+\s*=\s*[0-9]+"),
    ("sql_comment", r#"['";].*(--)|(/\*)"#),
];

lazy_static! {
    pub static ref XSS_PATTERNS: PatternSet = PatternSet::compile("xss", XSS_SPECS);
    pub static ref SQL_INJECTION_PATTERNS: PatternSet = PatternSet::compile("sql_injection", SQL_SPECS);

    /// `<script ...>...</script>`, shortest match, across newlines.
    pub static ref SCRIPT_BLOCK: Regex = RegexBuilder::new(r"<script(?-u:\b).*?</script>")
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .expect("script block pattern is valid");

    /// Quoted inline event handlers such as ` onclick="..."`.
    pub static ref EVENT_HANDLER_ATTR: Regex = RegexBuilder::new(r#"\s*on[A-Za-z0-9_]+\s*=\s*["'][^"']*["']"#)
        .case_insensitive(true)
        .build()
        .expect("event handler pattern is valid");

    pub static ref JAVASCRIPT_SCHEME: Regex = RegexBuilder::new(r"javascript:")
        .case_insensitive(true)
        .build()
        .expect("javascript scheme pattern is valid");

    pub static ref DATA_SCHEME: Regex = RegexBuilder::new(r"data:")
        .case_insensitive(true)
        .build()
        .expect("data scheme pattern is valid");
}
