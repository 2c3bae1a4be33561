//! Validation schemas: which rules apply to which form field.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::content::PolicyScanner;
use crate::errors::WellkeepError;
use crate::rules::{mental_health, NamedRule, Rule};

/// How rule strings that fail to parse are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Unknown names and bad parameters are errors.
    #[default]
    Strict,
    /// Unknown names and bad parameters are logged and skipped.
    Lenient,
}

/// Parses rule strings, failing on the first one that does not parse.
pub fn parse_rules<S: AsRef<str>>(rule_names: &[S]) -> Result<Vec<Rule>, WellkeepError> {
    rule_names
        .iter()
        .map(|s| s.as_ref().parse::<NamedRule>().map(Rule::Named))
        .collect()
}

/// Parses rule strings, dropping the ones that do not parse.
pub fn parse_rules_lenient<S: AsRef<str>>(rule_names: &[S]) -> Vec<Rule> {
    rule_names
        .iter()
        .filter_map(|s| match s.as_ref().parse::<NamedRule>() {
            Ok(rule) => Some(Rule::Named(rule)),
            Err(e) => {
                warn!("Ignoring rule '{}': {}", s.as_ref(), e);
                None
            }
        })
        .collect()
}

/// An ordered list of (field, rules) entries.
#[derive(Debug, Clone, Default)]
pub struct ValidationSchema {
    entries: Vec<(String, Vec<Rule>)>,
}

impl ValidationSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rules for `field`. Builder style.
    pub fn field(mut self, field: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.insert(field, rules);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rules: Vec<Rule>) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = rules,
            None => self.entries.push((field, rules)),
        }
    }

    pub fn rules_for(&self, field: &str) -> Option<&[Rule]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rules)| rules.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.entries.iter().map(|(f, r)| (f.as_str(), r.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rebinds every `crisisDetection` rule to `scanner`'s keyword list.
    ///
    /// Named rules check against the embedded policy; schemas built for a
    /// user policy go through here so its crisis terms apply.
    pub fn with_crisis_scanner(mut self, scanner: Arc<PolicyScanner>) -> Self {
        for (_, rules) in self.entries.iter_mut() {
            for rule in rules.iter_mut() {
                if matches!(rule, Rule::Named(NamedRule::CrisisDetection)) {
                    let scanner = Arc::clone(&scanner);
                    *rule = Rule::record(NamedRule::CrisisDetection.name(), move |value: Option<&str>| {
                        value
                            .filter(|v| !v.is_empty())
                            .and_then(|v| mental_health::crisis_detection_with(&scanner, v))
                    });
                }
            }
        }
        self
    }

    /// Builds a schema from a field -> rule-strings map, as stored in policy files.
    pub fn from_rule_map(rule_map: &BTreeMap<String, Vec<String>>, mode: SchemaMode) -> Result<Self, WellkeepError> {
        let mut schema = Self::new();
        for (field, rule_names) in rule_map {
            let rules = match mode {
                SchemaMode::Strict => parse_rules(rule_names)?,
                SchemaMode::Lenient => parse_rules_lenient(rule_names),
            };
            schema.insert(field.clone(), rules);
        }
        debug!("Built schema with {} field(s).", schema.len());
        Ok(schema)
    }

    /// Parses a YAML mapping of field name to a list of rule strings:
    ///
    /// ```yaml
    /// email: [required, email]
    /// password: [required, "min:8", password]
    /// ```
    pub fn from_yaml_str(text: &str, mode: SchemaMode) -> Result<Self> {
        let rule_map: BTreeMap<String, Vec<String>> =
            serde_yml::from_str(text).context("Failed to parse validation schema")?;
        Ok(Self::from_rule_map(&rule_map, mode)?)
    }

    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P, mode: SchemaMode) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        Self::from_yaml_str(&text, mode)
            .with_context(|| format!("Invalid schema file {}", path.display()))
    }
}
