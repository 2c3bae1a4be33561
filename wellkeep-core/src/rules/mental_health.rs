//! Journaling-specific rules.
//!
//! `crisis_detection` never rejects input. It returns an [`Advisory`] asking
//! the UI to surface support resources. `journal_length` is guidance too,
//! but it is reported as an ordinary message so forms can show it inline.

use crate::content::{self, PolicyScanner};
use crate::rules::messages;
use crate::rules::{Advisory, FieldError};
use crate::validators;

pub const MOOD_MIN: i64 = 1;
pub const MOOD_MAX: i64 = 10;
pub const JOURNAL_MIN_CHARS: usize = 10;
pub const JOURNAL_MAX_CHARS: usize = 5000;

/// Checks `value` against the embedded policy's crisis list.
pub fn crisis_detection(value: &str) -> Option<FieldError> {
    crisis_detection_with(content::default_scanner(), value)
}

/// Checks `value` against the crisis list of a specific policy.
pub fn crisis_detection_with(scanner: &PolicyScanner, value: &str) -> Option<FieldError> {
    if scanner.flags_crisis_rule(value) {
        log::info!("Crisis keyword detected in field value; advising support.");
        return Some(FieldError::Advisory(Advisory::crisis_support(messages::CRISIS_SUPPORT)));
    }
    None
}

pub fn mood_rating(value: &str) -> Option<FieldError> {
    match validators::parse_int_prefix(value) {
        Some(rating) if (MOOD_MIN..=MOOD_MAX).contains(&rating) => None,
        _ => Some(messages::MOOD_RATING.into()),
    }
}

pub fn journal_length(value: &str) -> Option<FieldError> {
    let len = validators::char_len(value);
    if len < JOURNAL_MIN_CHARS {
        return Some(messages::JOURNAL_TOO_SHORT.into());
    }
    if len > JOURNAL_MAX_CHARS {
        return Some(messages::JOURNAL_TOO_LONG.into());
    }
    None
}
