//! errors.rs - Custom error types for the wellkeep-core library.
//!
//! Validation and inspection never fail: they report problems as values.
//! These errors cover the fallible plumbing around them (parsing rule
//! strings, loading policies, reading and writing storage).
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum WellkeepError {
    #[error("Unknown validation rule '{0}'")]
    UnknownRule(String),

    #[error("Rule '{rule}': invalid parameter '{param}': {reason}")]
    InvalidRuleParameter {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("Form data must be a JSON object, got {0}")]
    InvalidForm(String),

    #[error("Policy validation failed:\n{0}")]
    PolicyValidation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to (de)serialize data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to build keyword scanner: {0}")]
    Lexicon(#[from] wellkeep_lexicon::LexiconError),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),
}

impl WellkeepError {
    pub(crate) fn invalid_param(rule: &str, param: &str, reason: impl Into<String>) -> Self {
        WellkeepError::InvalidRuleParameter {
            rule: rule.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}
