//! Policy configuration for `wellkeep-core`.
//!
//! A [`SecurityPolicy`] holds the keyword lists, limits and built-in form
//! schemas the rest of the crate works from. The default policy is embedded
//! from `config/default_policy.yaml`; user files are parsed as
//! [`PolicyOverrides`] and merged over it with [`merge_policy`].
//!
//! License: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::content::PolicyScanner;
use crate::errors::WellkeepError;
use crate::rules::{SchemaMode, ValidationSchema};
use crate::sanitizers::inspect::InspectOptions;

pub const DEFAULT_MAX_INPUT_LENGTH: usize = 5000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;
pub const DEFAULT_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_MAX_REQUESTS_PER_WINDOW: usize = 10;
pub const DEFAULT_SESSION_TIMEOUT_MS: u64 = 24 * 60 * 60 * 1000;
pub const DEFAULT_STORAGE_MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Field name -> rule strings, as written in policy files.
pub type SchemaSpec = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisisKeywords {
    /// Short list used by the `crisisDetection` form rule.
    pub rule: Vec<String>,
    /// Broader list used by `detect_crisis_content`.
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    pub max_input_length: usize,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self { max_input_length: DEFAULT_MAX_INPUT_LENGTH }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitPolicy {
    /// Attempts allowed per identifier within the window (login, submissions).
    pub max_attempts: usize,
    pub window_ms: u64,
    /// Request budget per window for API-style callers.
    pub max_requests_per_window: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            window_ms: DEFAULT_WINDOW_MS,
            max_requests_per_window: DEFAULT_MAX_REQUESTS_PER_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPolicy {
    pub timeout_ms: u64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self { timeout_ms: DEFAULT_SESSION_TIMEOUT_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePolicy {
    /// Entries older than this are discarded on read.
    pub max_age_ms: i64,
}

impl Default for StoragePolicy {
    fn default() -> Self {
        Self { max_age_ms: DEFAULT_STORAGE_MAX_AGE_MS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_file_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The complete, effective policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub crisis_keywords: CrisisKeywords,
    pub blocked_words: Vec<String>,
    pub common_passwords: Vec<String>,
    #[serde(default)]
    pub input: InputPolicy,
    #[serde(default)]
    pub rate_limit: RateLimitPolicy,
    #[serde(default)]
    pub session: SessionPolicy,
    #[serde(default)]
    pub storage: StoragePolicy,
    #[serde(default)]
    pub uploads: UploadPolicy,
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaSpec>,
}

/// A user policy file. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyOverrides {
    pub crisis_keywords: Option<CrisisKeywordOverrides>,
    pub blocked_words: Option<Vec<String>>,
    pub common_passwords: Option<Vec<String>>,
    pub input: Option<InputPolicy>,
    pub rate_limit: Option<RateLimitPolicy>,
    pub session: Option<SessionPolicy>,
    pub storage: Option<StoragePolicy>,
    pub uploads: Option<UploadPolicy>,
    pub schemas: Option<BTreeMap<String, SchemaSpec>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisKeywordOverrides {
    pub rule: Option<Vec<String>>,
    pub content: Option<Vec<String>>,
}

static DEFAULT_POLICY: Lazy<SecurityPolicy> = Lazy::new(|| {
    SecurityPolicy::load_default().expect("embedded default policy is valid")
});

/// The embedded default policy, parsed once.
pub fn default_policy() -> &'static SecurityPolicy {
    &DEFAULT_POLICY
}

impl SecurityPolicy {
    /// Parses the embedded default policy.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default policy from embedded string...");
        let default_yaml = include_str!("../config/default_policy.yaml");
        let policy: SecurityPolicy =
            serde_yml::from_str(default_yaml).context("Failed to parse default policy")?;
        debug!(
            "Loaded default policy: {} crisis terms, {} schemas.",
            policy.crisis_keywords.content.len(),
            policy.schemas.len()
        );
        Ok(policy)
    }

    /// Loads a user policy file and merges it over the default policy.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading policy overrides from: {}", path.display());
        let overrides = PolicyOverrides::load_from_file(path)?;
        let merged = merge_policy(Self::load_default()?, Some(overrides));
        validate_policy(&merged)
            .with_context(|| format!("Invalid policy file {}", path.display()))?;
        Ok(merged)
    }

    /// Builds the named built-in schema, if the policy defines one, with
    /// its `crisisDetection` rules bound to this policy's keywords.
    pub fn schema(&self, name: &str, mode: SchemaMode) -> Result<Option<ValidationSchema>, WellkeepError> {
        self.schemas
            .get(name)
            .map(|rule_map| ValidationSchema::from_rule_map(rule_map, mode))
            .transpose()?
            .map(|schema| self.bind_schema(schema))
            .transpose()
    }

    /// Binds the `crisisDetection` rules of `schema` to this policy's keywords.
    pub fn bind_schema(&self, schema: ValidationSchema) -> Result<ValidationSchema, WellkeepError> {
        let scanner = PolicyScanner::new(self)?;
        Ok(schema.with_crisis_scanner(Arc::new(scanner)))
    }

    /// `inspect_input` options with this policy's length limit.
    pub fn inspect_options(&self) -> InspectOptions {
        InspectOptions {
            max_length: self.input.max_input_length,
            ..InspectOptions::default()
        }
    }
}

impl PolicyOverrides {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        let overrides: PolicyOverrides = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse policy file {}", path.display()))?;
        Ok(overrides)
    }
}

/// Merges user overrides into a base policy.
///
/// Lists and scalar sections replace the base value wholesale; schemas are
/// merged by name, so a user file can add a form or redefine one.
pub fn merge_policy(base: SecurityPolicy, overrides: Option<PolicyOverrides>) -> SecurityPolicy {
    let Some(user) = overrides else {
        return base;
    };
    let mut merged = base;

    if let Some(crisis) = user.crisis_keywords {
        if let Some(rule) = crisis.rule {
            debug!("Overriding crisis rule keywords ({} terms).", rule.len());
            merged.crisis_keywords.rule = rule;
        }
        if let Some(content) = crisis.content {
            debug!("Overriding crisis content keywords ({} terms).", content.len());
            merged.crisis_keywords.content = content;
        }
    }
    if let Some(words) = user.blocked_words {
        merged.blocked_words = words;
    }
    if let Some(common) = user.common_passwords {
        merged.common_passwords = common;
    }
    if let Some(input) = user.input {
        merged.input = input;
    }
    if let Some(rate_limit) = user.rate_limit {
        merged.rate_limit = rate_limit;
    }
    if let Some(session) = user.session {
        merged.session = session;
    }
    if let Some(storage) = user.storage {
        merged.storage = storage;
    }
    if let Some(uploads) = user.uploads {
        merged.uploads = uploads;
    }
    if let Some(schemas) = user.schemas {
        for (name, rule_map) in schemas {
            debug!("Merging schema '{}' from user policy.", name);
            merged.schemas.insert(name, rule_map);
        }
    }

    merged
}

/// Checks a policy for blank keywords, zero limits and unparsable schema rules.
pub fn validate_policy(policy: &SecurityPolicy) -> Result<(), WellkeepError> {
    let mut errors = Vec::new();

    let lists = [
        ("crisis_keywords.rule", &policy.crisis_keywords.rule),
        ("crisis_keywords.content", &policy.crisis_keywords.content),
        ("blocked_words", &policy.blocked_words),
        ("common_passwords", &policy.common_passwords),
    ];
    for (name, list) in lists {
        if list.iter().any(|w| w.trim().is_empty()) {
            errors.push(format!("`{}` contains a blank entry.", name));
        }
    }

    if policy.input.max_input_length == 0 {
        errors.push("`input.max_input_length` must be greater than zero.".to_string());
    }
    if policy.rate_limit.max_attempts == 0 {
        errors.push("`rate_limit.max_attempts` must be greater than zero.".to_string());
    }
    if policy.rate_limit.window_ms == 0 {
        errors.push("`rate_limit.window_ms` must be greater than zero.".to_string());
    }
    if policy.rate_limit.max_requests_per_window == 0 {
        errors.push("`rate_limit.max_requests_per_window` must be greater than zero.".to_string());
    }
    if policy.session.timeout_ms == 0 {
        errors.push("`session.timeout_ms` must be greater than zero.".to_string());
    }
    if policy.storage.max_age_ms <= 0 {
        errors.push("`storage.max_age_ms` must be greater than zero.".to_string());
    }

    for (name, rule_map) in &policy.schemas {
        if let Err(e) = ValidationSchema::from_rule_map(rule_map, SchemaMode::Strict) {
            errors.push(format!("Schema '{}': {}", name, e));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(WellkeepError::PolicyValidation(errors.join("\n")))
    }
}
