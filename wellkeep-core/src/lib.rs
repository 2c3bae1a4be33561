// wellkeep-core/src/lib.rs
//! # Wellkeep Core Library
//!
//! `wellkeep-core` provides the form validation and input sanitization logic
//! behind a journaling and mental-health support application. It evaluates
//! ordered rule lists against single values or whole forms, inspects free text
//! for markup and query injection, flags crisis language, and wraps
//! persistence in timestamped envelopes.
//!
//! Validation and inspection are pure and never fail: problems are returned
//! as values. Only the plumbing around them (policy files, rule strings,
//! storage) returns `Result`.
//!
//! ## Modules
//!
//! * `rules`: Named and custom rules, schemas, and the field/form evaluator.
//! * `validators`: Low-level predicates (email, Australian mobile, URL, numeric) used by rules.
//! * `sanitizers`: `escape_html`, `strip_dangerous` and the `inspect_input` report.
//! * `content`: Crisis-keyword detection and block-list filtering.
//! * `strength`: Password strength scoring.
//! * `limiter`: Sliding-window attempt limiter.
//! * `storage`: `KeyValueStore` backends and the `SecureStorage` envelope.
//! * `token`: CSRF tokens and session identifiers.
//! * `debounce`: Delayed, cancellable validation on a tokio task.
//! * `config`: The `SecurityPolicy`, its embedded default, and user overrides.
//! * `errors`: The `WellkeepError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use wellkeep_core::{evaluate_form, FormData, SchemaMode, SecurityPolicy};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let policy = SecurityPolicy::load_default()?;
//!     let schema = policy.schema("register", SchemaMode::Strict)?.expect("built-in schema");
//!
//!     let form = FormData::from_json_str(
//!         r#"{"email": "sam@example.com", "password": "Abcdefg1", "confirmPassword": "Abcdefg2"}"#,
//!     )?;
//!     let result = evaluate_form(&form, &schema);
//!
//!     assert!(!result.is_valid);
//!     assert!(result.error_for("confirmPassword").is_some());
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod content;
pub mod debounce;
pub mod errors;
pub mod limiter;
pub mod rules;
pub mod sanitizers;
pub mod storage;
pub mod strength;
pub mod token;
pub mod validators;

/// Re-exports the policy types and loaders.
pub use config::{default_policy, merge_policy, validate_policy, PolicyOverrides, SecurityPolicy};

/// Re-exports the custom error type for clear error reporting.
pub use errors::WellkeepError;

/// Re-exports the rule engine.
pub use rules::{
    evaluate_field, evaluate_form, parse_rules, parse_rules_lenient, Advisory, FieldError, FormData,
    NamedRule, Rule, SchemaMode, ValidationResult, ValidationSchema,
};

pub use sanitizers::html::{escape_html, strip_dangerous};
pub use sanitizers::inspect::{inspect_input, InspectOptions, InspectReport};

pub use content::{detect_crisis_content, filter_inappropriate_content, PolicyScanner};
pub use debounce::DebouncedValidator;
pub use limiter::RateLimiter;
pub use storage::{FileStore, KeyValueStore, MemoryStore, SecureStorage};
pub use strength::{check_password_strength, PasswordStrength, StrengthLabel};
pub use token::{
    clear_session, current_session, generate_csrf_token, generate_session_id, is_valid_session_id, start_session,
};
