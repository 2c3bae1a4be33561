// wellkeep/src/cli.rs
//! This file defines the command-line interface (CLI) for the wellkeep application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "wellkeep",
    author = "Wellkeep Team",
    version = env!("CARGO_PKG_VERSION"),
    about = "Validate forms and inspect journal text",
    long_about = "Wellkeep runs the form validation rules and input sanitizers of a journaling application from the shell. Forms are checked against built-in or custom schemas, free text is inspected for markup and query injection, and crisis language is flagged for follow-up.",
    arg_required_else_help = true,
)]
pub struct Cli {
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// User policy merged over the built-in one.
    #[arg(long = "policy", value_name = "FILE", global = true, env = "WELLKEEP_POLICY", help = "Path to a YAML policy file merged over the built-in policy.")]
    pub policy: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `wellkeep` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Validates a JSON form against a schema and prints the result.")]
    Validate(ValidateCommand),

    #[command(about = "Inspects text for length, markup and query injection.")]
    Inspect(InspectCommand),

    #[command(about = "Masks blocked words and warns about crisis language.")]
    Filter(FilterCommand),

    #[command(about = "Scores the strength of a password.")]
    Strength(StrengthCommand),

    #[command(about = "Prints a fresh CSRF token or session id.")]
    Token(TokenCommand),

    #[command(about = "Reads and writes timestamped entries in a local store file.")]
    Store(StoreCommand),
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("schema_source").required(true).args(["schema", "preset"])))]
pub struct ValidateCommand {
    #[arg(long, value_name = "FILE", help = "JSON object of field name to value.")]
    pub form: PathBuf,

    #[arg(long, value_name = "FILE", help = "YAML schema mapping field names to rule lists.")]
    pub schema: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Use a schema defined in the policy (register, login, journal, profile).")]
    pub preset: Option<String>,

    #[arg(long, help = "Skip unknown rules with a warning instead of failing.")]
    pub lenient: bool,
}

/// Arguments for the `inspect` command.
#[derive(Parser, Debug)]
pub struct InspectCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    #[arg(long = "max-length", value_name = "N", help = "Maximum length in characters (defaults to the policy limit).")]
    pub max_length: Option<usize>,

    #[arg(long = "allow-html", help = "Strip dangerous markup instead of escaping everything.")]
    pub allow_html: bool,

    #[arg(long = "no-xss", help = "Skip the XSS check and leave the text unescaped.")]
    pub no_xss: bool,

    #[arg(long = "no-sql", help = "Skip the SQL injection check.")]
    pub no_sql: bool,
}

/// Arguments for the `filter` command.
#[derive(Parser, Debug)]
pub struct FilterCommand {
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,
}

/// Arguments for the `strength` command.
#[derive(Parser, Debug)]
pub struct StrengthCommand {
    /// Prompted for without echo when omitted.
    #[arg(value_name = "PASSWORD")]
    pub password: Option<String>,

    #[arg(long, help = "Print the result as JSON.")]
    pub json: bool,
}

/// Arguments for the `token` command.
#[derive(Parser, Debug)]
pub struct TokenCommand {
    #[arg(long, help = "Generate a session id instead of a CSRF token.")]
    pub session: bool,
}

/// Arguments for the `store` command.
#[derive(Parser, Debug)]
pub struct StoreCommand {
    #[arg(long, value_name = "FILE", help = "Store file (defaults to the user data directory).")]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub action: StoreAction,
}

#[derive(Subcommand, Debug)]
pub enum StoreAction {
    /// Stores VALUE under KEY. VALUE is parsed as JSON when possible.
    Set { key: String, value: String },
    /// Prints the value under KEY as JSON; expired entries are removed.
    Get { key: String },
    Remove { key: String },
    /// Removes every entry.
    Clear,
    /// Removes the session keys (sessionId, userToken, csrfToken).
    ClearSession,
}
