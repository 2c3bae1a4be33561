//! The built-in, name-addressable validation rules.
//!
//! A rule's string form is `name` or `name:param` (for example `min:8`,
//! `age:18,65`, `confirmPassword:password`). Parameters are parsed once, when
//! the rule is built, into the variant's typed fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::WellkeepError;
use crate::rules::mental_health;
use crate::rules::messages;
use crate::rules::FieldError;
use crate::validators;

pub const DEFAULT_MIN_AGE: i64 = 13;
pub const DEFAULT_MAX_AGE: i64 = 120;
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NamedRule {
    Required,
    Email,
    /// Minimum length in chars.
    Min(usize),
    /// Maximum length in chars.
    Max(usize),
    Password,
    /// The reference is either a literal or, inside a form, another field's name.
    ConfirmPassword(String),
    Phone,
    Age { min: i64, max: i64 },
    Url,
    Numeric,
    Alpha,
    AlphaNumeric,
    CrisisDetection,
    MoodRating,
    JournalLength,
}

impl NamedRule {
    /// The identifier used in the string form.
    pub fn name(&self) -> &'static str {
        match self {
            NamedRule::Required => "required",
            NamedRule::Email => "email",
            NamedRule::Min(_) => "min",
            NamedRule::Max(_) => "max",
            NamedRule::Password => "password",
            NamedRule::ConfirmPassword(_) => "confirmPassword",
            NamedRule::Phone => "phone",
            NamedRule::Age { .. } => "age",
            NamedRule::Url => "url",
            NamedRule::Numeric => "numeric",
            NamedRule::Alpha => "alpha",
            NamedRule::AlphaNumeric => "alphaNumeric",
            NamedRule::CrisisDetection => "crisisDetection",
            NamedRule::MoodRating => "moodRating",
            NamedRule::JournalLength => "journalLength",
        }
    }

    /// Evaluates the rule against one value.
    ///
    /// `confirm_against` overrides the literal reference of a
    /// `ConfirmPassword` rule; the form evaluator uses it to compare against
    /// a sibling field.
    pub fn check(&self, value: Option<&str>, confirm_against: Option<&str>) -> Option<FieldError> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            // Every rule but `required` is vacuously satisfied by an empty value.
            _ => {
                return match self {
                    NamedRule::Required => Some(messages::REQUIRED.into()),
                    _ => None,
                };
            }
        };

        match self {
            NamedRule::Required => None,
            NamedRule::Email => (!validators::is_valid_email(value)).then(|| messages::EMAIL.into()),
            NamedRule::Min(n) => {
                (validators::char_len(value) < *n).then(|| messages::min_length(*n).into())
            }
            NamedRule::Max(n) => {
                (validators::char_len(value) > *n).then(|| messages::max_length(*n).into())
            }
            NamedRule::Password => check_password(value),
            NamedRule::ConfirmPassword(reference) => {
                let expected = confirm_against.unwrap_or(reference.as_str());
                (value != expected).then(|| messages::PASSWORD_MISMATCH.into())
            }
            NamedRule::Phone => (!validators::is_valid_au_phone(value)).then(|| messages::PHONE.into()),
            NamedRule::Age { min, max } => check_age(value, *min, *max),
            NamedRule::Url => (!validators::is_absolute_url(value)).then(|| messages::URL.into()),
            NamedRule::Numeric => (!validators::is_numeric(value)).then(|| messages::NUMERIC.into()),
            NamedRule::Alpha => (!validators::is_alpha(value)).then(|| messages::ALPHA.into()),
            NamedRule::AlphaNumeric => {
                (!validators::is_alpha_numeric(value)).then(|| messages::ALPHA_NUMERIC.into())
            }
            NamedRule::CrisisDetection => mental_health::crisis_detection(value),
            NamedRule::MoodRating => mental_health::mood_rating(value),
            NamedRule::JournalLength => mental_health::journal_length(value),
        }
    }
}

fn check_password(value: &str) -> Option<FieldError> {
    if validators::char_len(value) < MIN_PASSWORD_LENGTH {
        return Some(messages::PASSWORD_TOO_SHORT.into());
    }
    if !validators::has_ascii_lowercase(value) {
        return Some(messages::PASSWORD_NO_LOWERCASE.into());
    }
    if !validators::has_ascii_uppercase(value) {
        return Some(messages::PASSWORD_NO_UPPERCASE.into());
    }
    if !validators::has_ascii_digit(value) {
        return Some(messages::PASSWORD_NO_DIGIT.into());
    }
    None
}

fn check_age(value: &str, min: i64, max: i64) -> Option<FieldError> {
    let Some(age) = validators::parse_int_prefix(value) else {
        return Some(messages::AGE_NOT_A_NUMBER.into());
    };
    if age < min {
        return Some(messages::age_below(min).into());
    }
    if age > max {
        return Some(messages::age_above(max).into());
    }
    None
}

fn parse_count(rule: &str, param: &str) -> Result<usize, WellkeepError> {
    param
        .trim()
        .parse::<usize>()
        .map_err(|e| WellkeepError::invalid_param(rule, param, e.to_string()))
}

fn parse_age_bounds(param: &str) -> Result<(i64, i64), WellkeepError> {
    let parse = |s: &str| {
        s.trim()
            .parse::<i64>()
            .map_err(|e| WellkeepError::invalid_param("age", param, e.to_string()))
    };
    let (min, max) = match param.split_once(',') {
        Some((min, max)) => (parse(min)?, parse(max)?),
        None => (parse(param)?, DEFAULT_MAX_AGE),
    };
    if min > max {
        return Err(WellkeepError::invalid_param("age", param, "minimum is greater than maximum"));
    }
    Ok((min, max))
}

impl FromStr for NamedRule {
    type Err = WellkeepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, param) = match s.split_once(':') {
            Some((name, param)) => (name.trim(), Some(param)),
            None => (s.trim(), None),
        };

        let no_param = |rule: NamedRule| match param {
            Some(p) => Err(WellkeepError::invalid_param(name, p, "rule takes no parameter")),
            None => Ok(rule),
        };
        let require_param = || {
            param.ok_or_else(|| WellkeepError::invalid_param(name, "", "missing required parameter"))
        };

        match name {
            "required" => no_param(NamedRule::Required),
            "email" => no_param(NamedRule::Email),
            "min" => Ok(NamedRule::Min(parse_count(name, require_param()?)?)),
            "max" => Ok(NamedRule::Max(parse_count(name, require_param()?)?)),
            "password" => no_param(NamedRule::Password),
            "confirmPassword" => Ok(NamedRule::ConfirmPassword(require_param()?.to_string())),
            "phone" => no_param(NamedRule::Phone),
            "age" => {
                let (min, max) = match param {
                    Some(p) => parse_age_bounds(p)?,
                    None => (DEFAULT_MIN_AGE, DEFAULT_MAX_AGE),
                };
                Ok(NamedRule::Age { min, max })
            }
            "url" => no_param(NamedRule::Url),
            "numeric" => no_param(NamedRule::Numeric),
            "alpha" => no_param(NamedRule::Alpha),
            "alphaNumeric" => no_param(NamedRule::AlphaNumeric),
            "crisisDetection" => no_param(NamedRule::CrisisDetection),
            "moodRating" => no_param(NamedRule::MoodRating),
            "journalLength" => no_param(NamedRule::JournalLength),
            _ => Err(WellkeepError::UnknownRule(s.to_string())),
        }
    }
}

impl TryFrom<String> for NamedRule {
    type Error = WellkeepError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NamedRule> for String {
    fn from(rule: NamedRule) -> Self {
        rule.to_string()
    }
}

impl fmt::Display for NamedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedRule::Min(n) | NamedRule::Max(n) => write!(f, "{}:{}", self.name(), n),
            NamedRule::ConfirmPassword(reference) => write!(f, "{}:{}", self.name(), reference),
            NamedRule::Age { min, max } if (*min, *max) == (DEFAULT_MIN_AGE, DEFAULT_MAX_AGE) => {
                f.write_str(self.name())
            }
            NamedRule::Age { min, max } => write!(f, "{}:{},{}", self.name(), min, max),
            _ => f.write_str(self.name()),
        }
    }
}
