// wellkeep/src/lib.rs
//! # Wellkeep CLI
//!
//! Command-line front end for `wellkeep-core`: validates JSON forms against
//! schemas, inspects and filters free text, scores passwords, issues tokens
//! and manages a local timestamped store.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;

pub use commands::run;
