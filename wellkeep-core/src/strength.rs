//! strength.rs - Password strength scoring for registration feedback.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::default_policy;
use crate::validators::{char_len, has_ascii_digit, has_ascii_lowercase, has_ascii_uppercase};

const SPECIAL_CHARS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;
const COMMON_PASSWORD_PENALTY: u8 = 2;

pub const FEEDBACK_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const FEEDBACK_NO_LOWERCASE: &str = "Add a lowercase letter";
pub const FEEDBACK_NO_UPPERCASE: &str = "Add an uppercase letter";
pub const FEEDBACK_NO_DIGIT: &str = "Add a number";
pub const FEEDBACK_NO_SPECIAL: &str = "Consider adding a special character";
pub const FEEDBACK_COMMON: &str = "Avoid common passwords";
pub const FEEDBACK_GOOD: &str = "Password strength is good";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLabel {
    #[serde(rename = "very weak")]
    VeryWeak,
    Weak,
    Fair,
    Strong,
    #[serde(rename = "very strong")]
    VeryStrong,
}

impl StrengthLabel {
    /// Label for a score; scores above 4 share the top label.
    pub fn for_score(score: u8) -> Self {
        match score {
            0 => StrengthLabel::VeryWeak,
            1 => StrengthLabel::Weak,
            2 => StrengthLabel::Fair,
            3 => StrengthLabel::Strong,
            _ => StrengthLabel::VeryStrong,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::VeryWeak => "very weak",
            StrengthLabel::Weak => "weak",
            StrengthLabel::Fair => "fair",
            StrengthLabel::Strong => "strong",
            StrengthLabel::VeryStrong => "very strong",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordStrength {
    /// 0 to 5.
    pub score: u8,
    /// `None` only for the empty password.
    pub strength: Option<StrengthLabel>,
    pub feedback: Vec<String>,
}

/// Scores `password` against the default common-password list.
pub fn check_password_strength(password: &str) -> PasswordStrength {
    check_password_strength_with(password, &default_policy().common_passwords)
}

/// Scores `password`: one point each for length, lowercase, uppercase, digit
/// and special character, minus two (floored at zero) when it contains any of
/// `common_passwords` case-insensitively.
pub fn check_password_strength_with(password: &str, common_passwords: &[String]) -> PasswordStrength {
    if password.is_empty() {
        return PasswordStrength {
            score: 0,
            strength: None,
            feedback: Vec::new(),
        };
    }

    let criteria = [
        (char_len(password) >= 8, FEEDBACK_TOO_SHORT),
        (has_ascii_lowercase(password), FEEDBACK_NO_LOWERCASE),
        (has_ascii_uppercase(password), FEEDBACK_NO_UPPERCASE),
        (has_ascii_digit(password), FEEDBACK_NO_DIGIT),
        (password.chars().any(|c| SPECIAL_CHARS.contains(c)), FEEDBACK_NO_SPECIAL),
    ];

    let mut score = 0u8;
    let mut feedback = Vec::new();
    for (met, message) in criteria {
        if met {
            score += 1;
        } else {
            feedback.push(message.to_string());
        }
    }

    let lowered = password.to_lowercase();
    if common_passwords
        .iter()
        .any(|common| lowered.contains(&common.to_lowercase()))
    {
        score = score.saturating_sub(COMMON_PASSWORD_PENALTY);
        feedback.push(FEEDBACK_COMMON.to_string());
    }

    if feedback.is_empty() {
        feedback.push(FEEDBACK_GOOD.to_string());
    }

    PasswordStrength {
        score,
        strength: Some(StrengthLabel::for_score(score)),
        feedback,
    }
}
