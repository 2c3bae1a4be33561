//! String sanitization and inspection.
//!
//! `html` holds the pure transformations (`escape_html`, `strip_dangerous`),
//! `patterns` compiles the XSS and SQL-injection heuristics once, and
//! `inspect` combines both into a single report for form input.

pub mod html;
pub mod inspect;
pub mod patterns;
