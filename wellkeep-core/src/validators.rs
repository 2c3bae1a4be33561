// File: wellkeep-core/src/validators.rs
//! Low-level predicates behind the named validation rules.
//!
//! These helpers answer yes/no questions about a single string. Turning an
//! answer into a user-facing message is the job of `rules::named`.
//!
//! Character classes follow the browser forms these rules were written for:
//! digits and the `[a-z]`/`[A-Z]` classes are ASCII-only, and "alpha" also
//! admits the CJK Unified Ideographs block `U+4E00..=U+9FA5`.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

static AU_MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+61|0)[2-9][0-9]{8}$").expect("phone pattern is valid"));

/// `local@domain.tld` shape check. No attempt is made at RFC 5322.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Australian mobile/landline shape: `+61` or `0`, a digit 2-9, eight more digits.
/// All whitespace is ignored.
pub fn is_valid_au_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    AU_MOBILE_RE.is_match(&compact)
}

/// Parses a leading integer the way browsers' `parseInt(s, 10)` does.
///
/// Leading whitespace and a single sign are accepted, parsing stops at the
/// first non-digit, and `None` is returned when no digit was read.
/// Values beyond `i64` saturate.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut acc: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let d = i64::from(b - b'0');
        acc = acc.saturating_mul(10).saturating_add(d);
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -acc } else { acc })
}

/// True when `Number(value)` would not be `NaN`.
///
/// Accepts decimal and exponent forms, `0x`/`0o`/`0b` integers, signed
/// `Infinity`, and the blank string (which browsers coerce to `0`).
pub fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return true;
    }

    let unsigned = trimmed.trim_start_matches(['+', '-']);
    if unsigned.len() + 1 < trimmed.len() {
        // more than one sign
        return false;
    }
    if unsigned == "Infinity" {
        return true;
    }

    if unsigned.len() == trimmed.len() && unsigned.len() > 2 {
        let (prefix, rest) = unsigned.split_at(2);
        let radix = match prefix {
            "0x" | "0X" => Some(16),
            "0o" | "0O" => Some(8),
            "0b" | "0B" => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return rest.chars().all(|c| c.is_digit(radix));
        }
    }

    // Rust also accepts "inf"/"nan" spellings, which browsers reject.
    if unsigned.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return false;
    }
    trimmed.parse::<f64>().is_ok()
}

/// True for an absolute URL that a WHATWG parser accepts.
pub fn is_absolute_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}

fn is_cjk_ideograph(c: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

/// Only ASCII letters and CJK ideographs, at least one char.
pub fn is_alpha(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic() || is_cjk_ideograph(c))
}

/// As [`is_alpha`], plus ASCII digits.
pub fn is_alpha_numeric(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || is_cjk_ideograph(c))
}

pub fn has_ascii_lowercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_lowercase())
}

pub fn has_ascii_uppercase(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_uppercase())
}

pub fn has_ascii_digit(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Length as users perceive it in the form: Unicode scalar values.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user example@test.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_au_phone() {
        assert!(is_valid_au_phone("0412345678"));
        assert!(is_valid_au_phone("+61 412 345 678"));
        assert!(is_valid_au_phone("0298765432"));
        assert!(!is_valid_au_phone("0112345678"));
        assert!(!is_valid_au_phone("041234567"));
        assert!(!is_valid_au_phone("61412345678"));
        assert!(!is_valid_au_phone("０４１２３４５６７８"));
    }

    #[test]
    fn test_parse_int_prefix_matches_parse_int() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  17 years"), Some(17));
        assert_eq!(parse_int_prefix("-5"), Some(-5));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("3.9"), Some(3));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_is_numeric() {
        for ok in ["1", "-2.5", "1e3", ".5", "5.", "0x1F", "0b101", "  7  ", "Infinity", "-Infinity", "   "] {
            assert!(is_numeric(ok), "expected numeric: {:?}", ok);
        }
        for bad in ["abc", "1_000", "inf", "NaN", "1,5", "0xZZ", "--1", "12px"] {
            assert!(!is_numeric(bad), "expected non-numeric: {:?}", bad);
        }
    }

    #[test]
    fn test_absolute_url() {
        assert!(is_absolute_url("https://example.com/path?q=1"));
        assert!(is_absolute_url("mailto:someone@example.com"));
        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("/relative/path"));
    }

    #[test]
    fn test_alpha_classes() {
        assert!(is_alpha("Hello"));
        assert!(is_alpha("你好World"));
        assert!(!is_alpha("Hello1"));
        assert!(!is_alpha("Héllo"));
        assert!(!is_alpha("two words"));
        assert!(is_alpha_numeric("abc123你好"));
        assert!(!is_alpha_numeric("abc_123"));
    }

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len("日记"), 2);
        assert_eq!(char_len("abc"), 3);
    }
}
