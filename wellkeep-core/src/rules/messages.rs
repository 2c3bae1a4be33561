//! User-facing messages produced by the named rules.

pub const REQUIRED: &str = "This field is required";
pub const EMAIL: &str = "Please enter a valid email address";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long";
pub const PASSWORD_NO_LOWERCASE: &str = "Password must contain a lowercase letter";
pub const PASSWORD_NO_UPPERCASE: &str = "Password must contain an uppercase letter";
pub const PASSWORD_NO_DIGIT: &str = "Password must contain a digit";
pub const PASSWORD_MISMATCH: &str = "The two passwords do not match";
pub const PHONE: &str = "Please enter a valid Australian phone number";
pub const AGE_NOT_A_NUMBER: &str = "Please enter a valid age";
pub const URL: &str = "Please enter a valid URL";
pub const NUMERIC: &str = "Please enter a valid number";
pub const ALPHA: &str = "Only letters and Chinese characters are allowed";
pub const ALPHA_NUMERIC: &str = "Only letters, digits and Chinese characters are allowed";

pub const CRISIS_SUPPORT: &str =
    "We noticed you may be going through a difficult time. Please consider reaching out for professional help";
pub const MOOD_RATING: &str = "Mood rating must be a number between 1 and 10";
pub const JOURNAL_TOO_SHORT: &str =
    "Try writing a little more; it can help you express how you are feeling";
pub const JOURNAL_TOO_LONG: &str =
    "This entry is very long; consider splitting it up or keeping it more concise";

pub fn min_length(n: usize) -> String {
    format!("At least {} characters are required", n)
}

pub fn max_length(n: usize) -> String {
    format!("At most {} characters are allowed", n)
}

pub fn age_below(min: i64) -> String {
    format!("Age must not be less than {}", min)
}

pub fn age_above(max: i64) -> String {
    format!("Age must not be greater than {}", max)
}
